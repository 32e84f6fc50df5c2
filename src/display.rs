//! コンソール表示
//!
//! 照合結果と残余項目を表形式で出力する。

use tender_compare_common::{ComparisonReport, MatchResult, ResidualTenderItem};

/// 表示幅に切り詰める（文字単位）
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

pub fn format_match_row(result: &MatchResult) -> String {
    let standard = format!("{}: {}", result.clause.label, result.clause.text);
    let (tender, score) = match &result.best_tender_item {
        Some(item) => (
            format!("{}: {}", item.label, item.text),
            format!("{:.3}", result.score),
        ),
        None => ("-".to_string(), "-".to_string()),
    };
    format!(
        "  {:<40}  {:<40}  {:>6}  {}",
        truncate(&standard, 40),
        truncate(&tender, 40),
        score,
        result.classification.label()
    )
}

pub fn format_residual_row(residual: &ResidualTenderItem) -> String {
    let item = &residual.item;
    format!(
        "  {:<30}  {:<40}  {}",
        truncate(&item.label, 30),
        truncate(&item.text, 40),
        residual.annotation
    )
}

pub fn print_report(report: &ComparisonReport) {
    println!("🧾 標準条項 vs 入札項目");
    for result in &report.matches {
        println!("{}", format_match_row(result));
    }

    println!();
    println!("🟨 標準に含まれない入札項目");
    if report.residuals.is_empty() {
        println!("  （なし）");
    }
    for residual in &report.residuals {
        println!("{}", format_residual_row(residual));
    }

    let summary = report.summary();
    println!();
    println!(
        "集計: 一致 {} / 要確認 {} / 不一致 {} / 追加項目 {}",
        summary.matched, summary.needs_clarification, summary.conflict, summary.residual
    );
}
