//! Excel読み込みモジュール
//!
//! calamineでシートを文字列の行列に変換し、table.rs で条項・項目に組み立てる。

pub mod table;

pub use table::{parse_standard_rows, parse_tender_rows, Loaded};

use crate::error::{Result, TenderCompareError};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tender_compare_common::{StandardClause, TenderItem};

/// セル値を文字列に変換
///
/// 整数値の浮動小数点は "30.0" ではなく "30" にする。
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(_) => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// 範囲を行列に変換
///
/// calamineの範囲は使用中の先頭セルから始まるため、列位置がA列基準になるよう
/// 左側を空セルで埋める。先頭の空行は詰めたまま（最初の使用行をヘッダーとみなす）。
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let start_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|row| {
            std::iter::repeat(String::new())
                .take(start_col)
                .chain(row.iter().map(cell_to_string))
                .collect()
        })
        .collect()
}

/// シートを文字列の行列として読み込む（シート名省略時は先頭シート）
pub fn read_sheet_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(TenderCompareError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;

    let name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(TenderCompareError::SheetNotFound(format!(
                    "{} ({})",
                    name,
                    path.display()
                )));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TenderCompareError::SheetNotFound(path.display().to_string()))?,
    };

    let range = workbook.worksheet_range(&name)?;
    Ok(range_to_rows(&range))
}

/// 標準条項ファイルを読み込む
pub fn load_standard_clauses(
    path: &Path,
    sheet: Option<&str>,
    label_header: &str,
    text_header: &str,
) -> Result<Loaded<StandardClause>> {
    let rows = read_sheet_rows(path, sheet)?;
    parse_standard_rows(&rows, label_header, text_header)
}

/// 入札項目ファイルを読み込む
pub fn load_tender_items(path: &Path, sheet: Option<&str>) -> Result<Loaded<TenderItem>> {
    let rows = read_sheet_rows(path, sheet)?;
    Ok(parse_tender_rows(&rows))
}
