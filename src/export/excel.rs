//! 棚卸ファイルのExcel生成
//!
//! カテゴリごとに1ブック、「Inventur」「Nicht_gefunden」の2シート。
//! Charge列はテキスト書式（@）で書き込み、数値への変換を防ぐ。

use crate::error::Result;
use crate::layout::{ledger_headers, ledger_sheet, CODE_COLUMN_INDEX, TIMESTAMP_FORMAT};
use inventur_common::{Category, EntryDetails, Ledger, LedgerEntry};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};

/// セル値
enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    Empty,
}

impl<'a> From<Option<f64>> for CellValue<'a> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Number)
    }
}

fn optional_text(value: &Option<String>) -> CellValue<'_> {
    match value.as_deref() {
        Some(s) if !s.is_empty() => CellValue::Text(s),
        _ => CellValue::Empty,
    }
}

/// エントリを1行分のセルに展開（先頭2列の記録時刻・Chargeは呼び出し側で書く）
fn row_values(entry: &LedgerEntry) -> Vec<CellValue<'_>> {
    let mut values = vec![
        CellValue::Text(&entry.material_id),
        CellValue::Text(&entry.short_text),
    ];

    match &entry.details {
        EntryDetails::Roll(r) => {
            values.push(r.length_m.into());
            values.push(r.reference_width_mm.map(f64::from).into());
            values.push(CellValue::Number(r.measured_width_mm as f64));
            values.push(r.area_m2.into());
            values.push(optional_text(&r.reference_bin));
            values.push(CellValue::Text(&r.measured_bin));
        }
        EntryDetails::Granulate(g) => {
            values.push(g.reference_weight_kg.into());
            values.push(CellValue::Number(g.measured_weight_kg));
        }
    }

    values.push(CellValue::Text(&entry.remark));
    values
}

fn write_sheet(
    worksheet: &mut Worksheet,
    headers: &[&str],
    entries: &[LedgerEntry],
    header_format: &Format,
    code_format: &Format,
) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, header_format)?;
        let width = if col == 3 { 36.0 } else { 16.0 };
        worksheet.set_column_width(col as u16, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (idx, entry) in entries.iter().enumerate() {
        let row = idx as u32 + 1;
        let timestamp = entry.timestamp.format(TIMESTAMP_FORMAT).to_string();
        worksheet.write_string(row, 0, &timestamp)?;
        worksheet.write_string_with_format(row, CODE_COLUMN_INDEX, &entry.code, code_format)?;

        for (offset, value) in row_values(entry).into_iter().enumerate() {
            let col = CODE_COLUMN_INDEX + 1 + offset as u16;
            match value {
                CellValue::Text(s) if !s.is_empty() => {
                    worksheet.write_string(row, col, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, n)?;
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// カテゴリの棚卸ブックをバッファに生成
pub fn generate_ledger_buffer(ledger: &Ledger, category: Category) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let code_format = Format::new().set_num_format("@");

    let headers = ledger_headers(category);
    for found in [true, false] {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(ledger_sheet(found))?;
        write_sheet(
            worksheet,
            headers,
            ledger.entries(category, found),
            &header_format,
            &code_format,
        )?;
    }

    Ok(workbook.save_to_buffer()?)
}
