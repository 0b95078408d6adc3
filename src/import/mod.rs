//! Excel読み込み
//!
//! - Arbeitstabelle（参照カタログ）の読み込み
//! - 既存の棚卸ファイルの再読み込み

pub mod cell;

use crate::error::{InventurError, Result};
use crate::layout::*;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use cell::{cell_datetime, cell_f64, cell_text, cell_u32};
use inventur_common::validation::{normalize_remark, MAX_WIDTH_MM, MIN_WIDTH_MM};
use inventur_common::{
    Catalog, Category, EntryDetails, GranulateDetails, GranulateReference, Ledger, LedgerEntry,
    RollDetails, RollReference,
};
use std::collections::HashMap;
use std::io::BufReader;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// ヘッダー行付きのシート
struct SheetTable {
    name: String,
    columns: HashMap<String, usize>,
    rows: Vec<Vec<Data>>,
}

impl SheetTable {
    fn from_range(name: &str, range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let columns: HashMap<String, usize> = rows
            .next()
            .map(|header| {
                header
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| (cell.to_string().trim().to_string(), idx))
                    .filter(|(name, _)| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Vec<Data>> = rows
            // 完全に空の行はスキップ
            .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
            .map(|row| row.to_vec())
            .collect();

        Self {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    fn require(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|col| !self.columns.contains_key(*col))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(InventurError::CatalogMissingColumns {
                sheet: self.name.clone(),
                columns: missing.join(", "),
            })
        }
    }

    fn has(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// 列の値（候補列名を順に探す）
    fn get<'a>(&self, row: &'a [Data], names: &[&str]) -> Option<&'a Data> {
        names
            .iter()
            .find_map(|name| self.columns.get(*name))
            .and_then(|idx| row.get(*idx))
    }
}

fn open_xlsx(path: &Path) -> Result<Xlsx<BufReader<File>>> {
    if !path.exists() {
        return Err(InventurError::FileNotFound(path.display().to_string()));
    }
    open_workbook(path).map_err(|e: calamine::XlsxError| {
        InventurError::ExcelRead(format!("{}: {}", path.display(), e))
    })
}

fn read_sheet(workbook: &mut Xlsx<BufReader<File>>, name: &str) -> Result<SheetTable> {
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| InventurError::ExcelRead(format!("シート「{}」: {}", name, e)))?;
    Ok(SheetTable::from_range(name, &range))
}

/// Arbeitstabelleを読み込む
///
/// ロールは「Rollen」シート（なければ先頭シート）、グラニュレートは
/// 「Granulat」シートがある場合のみ読み込む。必須列の欠落はエラー。
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let mut workbook = open_xlsx(path)?;
    let sheet_names = workbook.sheet_names();

    let roll_sheet = sheet_names
        .iter()
        .find(|n| n.as_str() == SHEET_ROLLS)
        .or_else(|| sheet_names.iter().find(|n| n.as_str() != SHEET_GRANULATE))
        .cloned()
        .ok_or_else(|| {
            InventurError::ExcelRead(format!("{}: ワークシートがありません", path.display()))
        })?;
    let has_granulate = sheet_names.iter().any(|n| n == SHEET_GRANULATE);

    let rolls = parse_roll_catalog(&read_sheet(&mut workbook, &roll_sheet)?)?;
    let granulate = if has_granulate {
        Some(parse_granulate_catalog(&read_sheet(&mut workbook, SHEET_GRANULATE)?)?)
    } else {
        None
    };

    info!(
        rolls = rolls.len(),
        granulate = granulate.as_ref().map_or(0, Vec::len),
        "Arbeitstabelle読み込み完了: {}",
        path.display()
    );
    Ok(Catalog::new(rolls, granulate))
}

fn number_or_zero(table: &SheetTable, row: &[Data], column: &str, code: &str) -> f64 {
    cell_f64(table.get(row, &[column])).unwrap_or_else(|| {
        warn!(sheet = %table.name, code = %code, column, "数値が空のため0を使用");
        0.0
    })
}

fn parse_roll_catalog(table: &SheetTable) -> Result<Vec<RollReference>> {
    table.require(ROLL_CATALOG_COLUMNS)?;

    let mut records = Vec::new();
    for row in &table.rows {
        let code = cell_text(table.get(row, &[COL_CODE]));
        if code.is_empty() {
            continue;
        }
        let width = number_or_zero(table, row, COL_WIDTH, &code);
        let bin = cell_text(table.get(row, &[COL_STORAGE_BIN]));

        records.push(RollReference {
            material_id: cell_text(table.get(row, &[COL_MATERIAL])),
            short_text: cell_text(table.get(row, &[COL_SHORT_TEXT])),
            length_m: number_or_zero(table, row, COL_LENGTH, &code),
            width_mm: width.max(0.0).round() as u32,
            available_area_m2: number_or_zero(table, row, COL_AVAILABLE, &code),
            bin: (!bin.is_empty()).then_some(bin),
            code,
        });
    }
    Ok(records)
}

fn parse_granulate_catalog(table: &SheetTable) -> Result<Vec<GranulateReference>> {
    table.require(GRANULATE_CATALOG_COLUMNS)?;

    let mut records = Vec::new();
    for row in &table.rows {
        let code = cell_text(table.get(row, &[COL_CODE]));
        if code.is_empty() {
            continue;
        }
        records.push(GranulateReference {
            material_id: cell_text(table.get(row, &[COL_MATERIAL])),
            short_text: cell_text(table.get(row, &[COL_SHORT_TEXT])),
            available_weight_kg: number_or_zero(table, row, COL_AVAILABLE, &code),
            code,
        });
    }
    Ok(records)
}

/// 既存の棚卸ファイルを台帳に読み込む（ファイルがなければ空）
pub fn load_ledger(roll_path: &Path, granulate_path: &Path) -> Result<Ledger> {
    let mut ledger = Ledger::new();
    load_ledger_file(&mut ledger, Category::Roll, roll_path)?;
    load_ledger_file(&mut ledger, Category::Granulate, granulate_path)?;

    if !ledger.is_empty() {
        info!("既存の棚卸データを読み込み: {}件", ledger.len());
    }
    Ok(ledger)
}

fn load_ledger_file(ledger: &mut Ledger, category: Category, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let mut workbook = open_xlsx(path)?;
    let sheet_names = workbook.sheet_names();

    for found in [true, false] {
        let sheet = ledger_sheet(found);
        if !sheet_names.iter().any(|n| n == sheet) {
            continue;
        }
        let table = read_sheet(&mut workbook, sheet)?;
        for row in &table.rows {
            let Some(entry) = parse_ledger_row(&table, row, category, found) else {
                continue;
            };
            let code = entry.code.clone();
            if let Err(e) = ledger.append(entry) {
                warn!(file = %path.display(), sheet, "行をスキップ ({}): {}", code, e);
            }
        }
    }
    Ok(())
}

fn parse_ledger_row(
    table: &SheetTable,
    row: &[Data],
    category: Category,
    found: bool,
) -> Option<LedgerEntry> {
    let code = cell_text(table.get(row, &[COL_CODE]));
    if code.is_empty() {
        return None;
    }
    let Some(timestamp) = cell_datetime(table.get(row, &[COL_TIMESTAMP])) else {
        warn!(sheet = %table.name, code = %code, "記録時刻が不正なため行をスキップ");
        return None;
    };

    let details = match category {
        Category::Roll => {
            // 旧形式の「Breite mm」: Inventurシートではカタログ幅、Nicht_gefundenでは手入力幅
            let legacy_width = cell_u32(table.get(row, &[COL_WIDTH]));
            let reference_width_mm = cell_u32(table.get(row, &[COL_REF_WIDTH]))
                .or(legacy_width.filter(|_| found));
            let measured_width = cell_u32(table.get(row, &[COL_MEASURED_WIDTH])).or_else(|| {
                // 旧形式には実測幅の列がない
                if table.has(COL_MEASURED_WIDTH) {
                    None
                } else if found {
                    reference_width_mm
                } else {
                    legacy_width
                }
            });
            let Some(measured_width_mm) =
                measured_width.filter(|w| (MIN_WIDTH_MM..=MAX_WIDTH_MM).contains(w))
            else {
                warn!(sheet = %table.name, code = %code, "実測幅が空または範囲外のため行をスキップ");
                return None;
            };

            let measured_bin = cell_text(table.get(row, &[COL_MEASURED_BIN, LEGACY_COL_BIN]));
            if measured_bin.is_empty() {
                warn!(sheet = %table.name, code = %code, "Fachが空のため行をスキップ");
                return None;
            }
            let reference_bin = cell_text(table.get(row, &[COL_REF_BIN]));
            EntryDetails::Roll(RollDetails {
                length_m: cell_f64(table.get(row, &[COL_LENGTH])),
                reference_width_mm,
                measured_width_mm,
                area_m2: cell_f64(table.get(row, &[COL_AREA])),
                reference_bin: (!reference_bin.is_empty()).then_some(reference_bin),
                measured_bin,
            })
        }
        Category::Granulate => {
            let Some(measured_weight_kg) =
                cell_f64(table.get(row, &[COL_MEASURED_WEIGHT])).filter(|w| *w > 0.0)
            else {
                warn!(sheet = %table.name, code = %code, "実測重量が空または0以下のため行をスキップ");
                return None;
            };
            EntryDetails::Granulate(GranulateDetails {
                reference_weight_kg: cell_f64(table.get(row, &[COL_REF_WEIGHT])),
                measured_weight_kg,
            })
        }
    };

    Some(LedgerEntry {
        material_id: cell_text(table.get(row, &[COL_MATERIAL])),
        short_text: cell_text(table.get(row, &[COL_SHORT_TEXT])),
        timestamp,
        remark: normalize_remark(&cell_text(table.get(row, &[COL_REMARK]))),
        found,
        details,
        code,
    })
}
