//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに書き出す。

use crate::error::{Result, TenderCompareError};
use std::path::Path;
use tender_compare_common::export::excel_core::generate_report_buffer;
use tender_compare_common::ComparisonReport;

pub fn generate_excel(report: &ComparisonReport, output_path: &Path) -> Result<()> {
    let buffer = generate_report_buffer(report).map_err(TenderCompareError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(output_path, buffer)
        .map_err(|e| TenderCompareError::ExcelGeneration(format!("保存エラー: {}", e)))?;

    Ok(())
}
