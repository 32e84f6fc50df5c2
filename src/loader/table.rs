//! 表データ（文字列セルの行列）から標準条項・入札項目を組み立てる
//!
//! 必須項目が空の行は黙って除外し、除外後の並びで0始まりのidを振る。

use crate::error::{Result, TenderCompareError};
use tender_compare_common::{StandardClause, TenderItem};

/// 入札表: ラベル列（B列）
pub const TENDER_LABEL_COL: usize = 1;
/// 入札表: 値列（C列）
pub const TENDER_TEXT_COL: usize = 2;
/// 入札表: 出典列（D列、任意）
pub const TENDER_LOCATOR_COL: usize = 3;
/// 入札表: ヘッダー直後の読み飛ばし行数
pub const TENDER_SKIP_ROWS: usize = 1;

/// 読み込み結果（除外件数付き）
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|s| s.trim()).unwrap_or("")
}

/// ヘッダー名から列番号を探す（大文字小文字・前後空白を無視）
pub fn find_column(header: &[String], name: &str) -> Option<usize> {
    let needle = name.trim().to_lowercase();
    header
        .iter()
        .position(|h| h.trim().to_lowercase() == needle)
}

/// 標準表をパース
///
/// `rows[0]` をヘッダーとして扱う。指定ヘッダーがどちらも無い場合は先頭2列を使い、
/// 片方だけ見つかった場合は別の列を取り違えないようエラーにする。
pub fn parse_standard_rows(
    rows: &[Vec<String>],
    label_header: &str,
    text_header: &str,
) -> Result<Loaded<StandardClause>> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(Loaded { rows: Vec::new(), dropped: 0 });
    };

    let (label_col, text_col) = match (
        find_column(header, label_header),
        find_column(header, text_header),
    ) {
        (Some(l), Some(t)) => (l, t),
        (None, None) => (0, 1),
        (Some(_), None) => return Err(missing_header(text_header, header)),
        (None, Some(_)) => return Err(missing_header(label_header, header)),
    };

    let mut clauses = Vec::new();
    let mut dropped = 0;

    for row in data {
        let label = cell(row, label_col);
        let text = cell(row, text_col);
        if label.is_empty() || text.is_empty() {
            dropped += 1;
            continue;
        }
        clauses.push(StandardClause::new(clauses.len(), label, text));
    }

    Ok(Loaded { rows: clauses, dropped })
}

fn missing_header(name: &str, header: &[String]) -> TenderCompareError {
    TenderCompareError::ColumnNotFound(format!(
        "\"{}\" (ヘッダー: {})",
        name,
        header.join(", ")
    ))
}

/// 入札表をパース
///
/// ヘッダー行と、その直後の1行（元シートのレイアウト由来）を読み飛ばしてから
/// B列・C列が揃っている行だけを採用する。
pub fn parse_tender_rows(rows: &[Vec<String>]) -> Loaded<TenderItem> {
    let mut items = Vec::new();
    let mut dropped = 0;

    for row in rows.iter().skip(1 + TENDER_SKIP_ROWS) {
        let label = cell(row, TENDER_LABEL_COL);
        let text = cell(row, TENDER_TEXT_COL);
        if label.is_empty() || text.is_empty() {
            dropped += 1;
            continue;
        }

        let mut item = TenderItem::new(items.len(), label, text);
        let locator = cell(row, TENDER_LOCATOR_COL);
        if !locator.is_empty() {
            item = item.with_locator(locator);
        }
        items.push(item);
    }

    Loaded { rows: items, dropped }
}
