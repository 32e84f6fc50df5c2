//! 照合パイプライン
//!
//! 読み込み済みの条項・項目を埋め込み、共通ライブラリの照合コアに渡す。

use crate::embedder::{EmbeddingCache, EmbeddingService};
use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tender_compare_common::{
    compare_embeddings, ComparisonReport, MatchField, StandardClause, TenderItem,
};

/// 2つの入力ファイル（どちらかが未指定なら入力待ち）
#[derive(Debug, Clone, Default)]
pub struct ComparisonInputs {
    pub standard: Option<PathBuf>,
    pub tender: Option<PathBuf>,
}

impl ComparisonInputs {
    /// 両方揃っていればパスを返す
    pub fn ready(&self) -> Option<(&Path, &Path)> {
        match (&self.standard, &self.tender) {
            (Some(s), Some(t)) => Some((s.as_path(), t.as_path())),
            _ => None,
        }
    }

    /// 未指定の入力名
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.standard.is_none() {
            missing.push("標準条項ファイル (--standard)");
        }
        if self.tender.is_none() {
            missing.push("入札ファイル (--tender)");
        }
        missing
    }
}

/// 照合オプション
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub match_on: MatchField,
    pub verbose: bool,
    pub show_progress: bool,
}

fn spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// 照合を1回実行
///
/// 埋め込みは条項リスト・項目リストごとに1回。入札項目が空なら埋め込みを呼ばない。
/// 埋め込みに失敗した場合は途中結果を返さずにエラーにする。
pub async fn run_comparison(
    clauses: &[StandardClause],
    items: &[TenderItem],
    service: &EmbeddingService,
    mut cache: Option<&mut EmbeddingCache>,
    options: RunOptions,
) -> Result<ComparisonReport> {
    if clauses.is_empty() || items.is_empty() {
        if options.verbose {
            println!("  埋め込みをスキップ（条項{}件 / 項目{}件）", clauses.len(), items.len());
        }
        return Ok(compare_embeddings(clauses, items, &[], &[])?);
    }

    let clause_texts = options.match_on.clause_texts(clauses);
    let item_texts = options.match_on.item_texts(items);

    let pb = spinner(&format!("標準条項を埋め込み中 ({}件)", clauses.len()), options.show_progress);
    let clause_vectors = service
        .embed_with_cache(&clause_texts, cache.as_deref_mut(), options.verbose)
        .await;
    pb.finish_and_clear();
    let clause_vectors = clause_vectors?;

    let pb = spinner(&format!("入札項目を埋め込み中 ({}件)", items.len()), options.show_progress);
    let item_vectors = service
        .embed_with_cache(&item_texts, cache.as_deref_mut(), options.verbose)
        .await;
    pb.finish_and_clear();
    let item_vectors = item_vectors?;

    if options.verbose {
        let dim = clause_vectors.first().map(|v| v.len()).unwrap_or(0);
        println!("  埋め込み次元: {}", dim);
    }

    Ok(compare_embeddings(clauses, items, &clause_vectors, &item_vectors)?)
}
