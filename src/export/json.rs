//! JSON出力
//!
//! 照合結果に生成日時・埋め込み名・入力ファイル名を付けて保存する。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tender_compare_common::{ComparisonReport, ComparisonSummary};

/// レポートのメタ情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub generated_at: String,
    pub embedder: String,
    pub match_on: String,
    pub standard_file: String,
    pub tender_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub meta: ReportMeta,
    pub summary: ComparisonSummary,
    #[serde(flatten)]
    pub report: ComparisonReport,
}

impl JsonReport {
    pub fn new(report: &ComparisonReport, meta: ReportMeta) -> Self {
        Self {
            meta,
            summary: report.summary(),
            report: report.clone(),
        }
    }
}

pub fn generate_json(report: &ComparisonReport, meta: ReportMeta, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::new(report, meta))?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, json)?;
    Ok(())
}
