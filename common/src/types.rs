//! 照合データ型定義
//!
//! 標準条項・入札項目・照合結果など、CLIとテストで共有する型。

use serde::{Deserialize, Serialize};

/// 「一致」と判定する下限（この値を含まない）
pub const MATCH_THRESHOLD: f32 = 0.85;

/// 「要確認」と判定する下限（この値を含まない）
pub const CLARIFICATION_THRESHOLD: f32 = 0.60;

/// 入札項目が1件もない場合のスコア
pub const NO_MATCH_SCORE: f32 = -1.0;

/// 残余項目に付与する固定コメント
pub const RESIDUAL_ANNOTATION: &str = "Not part of Standards";

/// 標準条項（フィルタ後の並び順でidを採番）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardClause {
    pub id: usize,
    pub label: String,
    pub text: String,
}

impl StandardClause {
    pub fn new(id: usize, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            text: text.into(),
        }
    }
}

/// 入札項目（フィルタ後の並び順でidを採番）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderItem {
    pub id: usize,
    pub label: String,
    pub text: String,

    /// 出典位置など（照合には使わない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl TenderItem {
    pub fn new(id: usize, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            text: text.into(),
            locator: None,
        }
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }
}

/// 埋め込み対象とするフィールド
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    /// 本文（説明・値）
    #[default]
    Text,
    /// ラベル（条項名）
    Label,
    /// "ラベル: 本文"
    Combined,
}

impl MatchField {
    /// 埋め込みに渡す文字列を組み立てる
    pub fn extract(&self, label: &str, text: &str) -> String {
        match self {
            MatchField::Text => text.to_string(),
            MatchField::Label => label.to_string(),
            MatchField::Combined => format!("{}: {}", label, text),
        }
    }

    pub fn clause_texts(&self, clauses: &[StandardClause]) -> Vec<String> {
        clauses.iter().map(|c| self.extract(&c.label, &c.text)).collect()
    }

    pub fn item_texts(&self, items: &[TenderItem]) -> Vec<String> {
        items.iter().map(|t| self.extract(&t.label, &t.text)).collect()
    }
}

impl std::str::FromStr for MatchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "value" => Ok(MatchField::Text),
            "label" | "name" => Ok(MatchField::Label),
            "combined" | "both" => Ok(MatchField::Combined),
            _ => Err(format!("Unknown match field: {}. Use text, label, or combined", s)),
        }
    }
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchField::Text => write!(f, "text"),
            MatchField::Label => write!(f, "label"),
            MatchField::Combined => write!(f, "combined"),
        }
    }
}

/// 3段階の判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    Match,
    NeedsClarification,
    Conflict,
}

impl Classification {
    /// スコアから判定（境界値は上側に含めない）
    pub fn from_score(score: f32) -> Self {
        if score > MATCH_THRESHOLD {
            Classification::Match
        } else if score > CLARIFICATION_THRESHOLD {
            Classification::NeedsClarification
        } else {
            Classification::Conflict
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            Classification::Match => ColorTag::Green,
            Classification::NeedsClarification => ColorTag::Yellow,
            Classification::Conflict => ColorTag::Red,
        }
    }

    /// 画面・Excel表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Match => "✅ Match",
            Classification::NeedsClarification => "🟡 Needs Clarification",
            Classification::Conflict => "❌ Conflict or Not Found",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Match => write!(f, "Match"),
            Classification::NeedsClarification => write!(f, "Needs Clarification"),
            Classification::Conflict => write!(f, "Conflict"),
        }
    }
}

/// 表示色タグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Yellow,
    Red,
}

impl ColorTag {
    /// Excelの塗りつぶし色（RGB）
    pub fn fill_rgb(&self) -> u32 {
        match self {
            ColorTag::Green => 0xC6EFCE,
            ColorTag::Yellow => 0xFFF2CC,
            ColorTag::Red => 0xF4CCCC,
        }
    }

    pub fn fill_hex(&self) -> String {
        format!("{:06X}", self.fill_rgb())
    }
}

/// 標準条項1件の照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub clause: StandardClause,

    /// 入札項目が空のときはNone
    pub best_tender_item: Option<TenderItem>,

    /// 最大コサイン類似度（入札項目なしは NO_MATCH_SCORE）
    pub score: f32,

    pub classification: Classification,
}

impl MatchResult {
    pub fn color(&self) -> ColorTag {
        self.classification.color()
    }

    /// 入札項目なしの結果
    pub fn unmatched(clause: StandardClause) -> Self {
        Self {
            clause,
            best_tender_item: None,
            score: NO_MATCH_SCORE,
            classification: Classification::Conflict,
        }
    }
}

/// どの標準条項にも選ばれなかった入札項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualTenderItem {
    pub item: TenderItem,
    pub annotation: String,
}

impl ResidualTenderItem {
    pub fn new(item: TenderItem) -> Self {
        Self {
            item,
            annotation: RESIDUAL_ANNOTATION.to_string(),
        }
    }

    pub fn color(&self) -> ColorTag {
        ColorTag::Yellow
    }
}

/// 判定件数の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub matched: usize,
    pub needs_clarification: usize,
    pub conflict: usize,
    pub residual: usize,
}

/// 照合1回分の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub matches: Vec<MatchResult>,
    pub residuals: Vec<ResidualTenderItem>,
}

impl ComparisonReport {
    pub fn summary(&self) -> ComparisonSummary {
        let mut summary = ComparisonSummary {
            residual: self.residuals.len(),
            ..Default::default()
        };
        for result in &self.matches {
            match result.classification {
                Classification::Match => summary.matched += 1,
                Classification::NeedsClarification => summary.needs_clarification += 1,
                Classification::Conflict => summary.conflict += 1,
            }
        }
        summary
    }
}
