pub mod excel;
pub mod json;

pub use json::ReportMeta;

use crate::cli::ExportFormat;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tender_compare_common::ComparisonReport;

/// 既定の出力ファイル名（拡張子なし）
pub const DEFAULT_REPORT_NAME: &str = "Standards_Tender_Comparison_Result";

fn output_path_for_format(output: &Path, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_REPORT_NAME, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let excel_path = output.join(format!("{}.xlsx", DEFAULT_REPORT_NAME));
        let json_path = output.join(format!("{}.json", DEFAULT_REPORT_NAME));
        (excel_path, json_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_REPORT_NAME);
        (parent.join(format!("{}.xlsx", stem)), parent.join(format!("{}.json", stem)))
    }
}

/// 形式に応じてレポートを書き出し、出力したパスを返す
pub fn export_report(
    report: &ComparisonReport,
    format: &ExportFormat,
    output: &Path,
    meta: ReportMeta,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    match format {
        ExportFormat::Excel => {
            let output_path = output_path_for_format(output, "xlsx");
            println!("- Excelを生成中...");
            excel::generate_excel(report, &output_path)?;
            println!("✔ Excel出力: {}", output_path.display());
            written.push(output_path);
        }
        ExportFormat::Json => {
            let output_path = output_path_for_format(output, "json");
            json::generate_json(report, meta, &output_path)?;
            println!("✔ JSON出力: {}", output_path.display());
            written.push(output_path);
        }
        ExportFormat::Both => {
            let (excel_path, json_path) = output_paths_for_both(output);

            println!("- Excelを生成中...");
            excel::generate_excel(report, &excel_path)?;
            println!("✔ Excel出力: {}", excel_path.display());

            json::generate_json(report, meta, &json_path)?;
            println!("✔ JSON出力: {}", json_path.display());

            written.push(excel_path);
            written.push(json_path);
        }
    }

    Ok(written)
}
