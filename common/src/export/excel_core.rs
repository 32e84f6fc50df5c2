//! Excel生成（共通ライブラリ）
//!
//! 照合結果を2シート構成のExcelに書き出す。
//! - シート1: 標準条項ごとの判定（判定セルを判定色で塗る）
//! - シート2: 残余入札項目（全セル黄色）

use crate::types::{ComparisonReport, MatchResult, ResidualTenderItem};
use rust_xlsxwriter::*;

/// シート1の名前
pub const COMPARISON_SHEET: &str = "Standards vs Tender";

/// シート2の名前
pub const RESIDUAL_SHEET: &str = "Extra Tender Fields";

const COMPARISON_HEADERS: [&str; 4] = ["Standards", "Tender Brief", "Score", "Inference"];
const RESIDUAL_HEADERS: [&str; 4] = ["Tender Brief Extra Field", "Value", "Locator", "Comment"];

/// "ラベル: 本文" 形式のセル文字列
fn standard_cell(result: &MatchResult) -> String {
    format!("{}: {}", result.clause.label, result.clause.text)
}

fn tender_cell(result: &MatchResult) -> String {
    match &result.best_tender_item {
        Some(item) => format!("{}: {}", item.label, item.text),
        None => "-".to_string(),
    }
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::Black)
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA))
}

fn fill_format(rgb: u32) -> Format {
    Format::new()
        .set_font_color(Color::Black)
        .set_background_color(Color::RGB(rgb))
        .set_pattern(FormatPattern::Solid)
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter)
}

/// 照合結果をExcelバッファに生成
pub fn generate_report_buffer(report: &ComparisonReport) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    write_comparison_sheet(&mut workbook, &report.matches)?;
    write_residual_sheet(&mut workbook, &report.residuals)?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn write_comparison_sheet(workbook: &mut Workbook, matches: &[MatchResult]) -> Result<(), String> {
    let header = header_format();
    let text_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter);
    let score_format = Format::new()
        .set_num_format("0.000")
        .set_align(FormatAlign::VerticalCenter);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(COMPARISON_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, (title, width)) in COMPARISON_HEADERS
        .iter()
        .zip([60.0, 60.0, 10.0, 26.0])
        .enumerate()
    {
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (i, result) in matches.iter().enumerate() {
        let row = i as u32 + 1;
        let inference_format = fill_format(result.color().fill_rgb());

        worksheet
            .write_string_with_format(row, 0, standard_cell(result), &text_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet
            .write_string_with_format(row, 1, tender_cell(result), &text_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;

        // 入札項目なしはスコア欄を空にする
        if result.best_tender_item.is_some() {
            worksheet
                .write_number_with_format(row, 2, result.score as f64, &score_format)
                .map_err(|e| format!("スコア書き込みエラー: {}", e))?;
        }

        worksheet
            .write_string_with_format(row, 3, result.classification.label(), &inference_format)
            .map_err(|e| format!("判定書き込みエラー: {}", e))?;
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    Ok(())
}

fn write_residual_sheet(
    workbook: &mut Workbook,
    residuals: &[ResidualTenderItem],
) -> Result<(), String> {
    let header = header_format();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(RESIDUAL_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, (title, width)) in RESIDUAL_HEADERS
        .iter()
        .zip([40.0, 50.0, 20.0, 26.0])
        .enumerate()
    {
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (i, residual) in residuals.iter().enumerate() {
        let row = i as u32 + 1;
        let fill = fill_format(residual.color().fill_rgb());
        let item = &residual.item;
        let cells = [
            item.label.as_str(),
            item.text.as_str(),
            item.locator.as_deref().unwrap_or(""),
            residual.annotation.as_str(),
        ];

        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string_with_format(row, col as u16, *value, &fill)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    Ok(())
}
