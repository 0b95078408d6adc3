//! シート・列レイアウト定義
//!
//! Arbeitstabelle（入力）と棚卸ファイル（出力）の列名。読み込み・書き出しで共用。

use inventur_common::Category;

// Arbeitstabelle
pub const SHEET_ROLLS: &str = "Rollen";
pub const SHEET_GRANULATE: &str = "Granulat";

pub const COL_CODE: &str = "Charge";
pub const COL_MATERIAL: &str = "Material";
pub const COL_SHORT_TEXT: &str = "Materialkurztext";
pub const COL_LENGTH: &str = "Länge m";
pub const COL_WIDTH: &str = "Breite mm";
pub const COL_AVAILABLE: &str = "Frei verwendbar";
pub const COL_STORAGE_BIN: &str = "Lagerplatz";

pub const ROLL_CATALOG_COLUMNS: &[&str] = &[
    COL_CODE,
    COL_MATERIAL,
    COL_SHORT_TEXT,
    COL_LENGTH,
    COL_WIDTH,
    COL_AVAILABLE,
];

pub const GRANULATE_CATALOG_COLUMNS: &[&str] =
    &[COL_CODE, COL_MATERIAL, COL_SHORT_TEXT, COL_AVAILABLE];

// 棚卸ファイル
pub const SHEET_FOUND: &str = "Inventur";
pub const SHEET_NOT_FOUND: &str = "Nicht_gefunden";

pub const COL_TIMESTAMP: &str = "Datum/Uhrzeit";
pub const COL_REF_WIDTH: &str = "Breite mm (Soll)";
pub const COL_MEASURED_WIDTH: &str = "Breite mm (Ist)";
pub const COL_AREA: &str = "Fläche m²";
pub const COL_REF_BIN: &str = "Fach (Soll)";
pub const COL_MEASURED_BIN: &str = "Fach (Ist)";
pub const COL_REF_WEIGHT: &str = "Gewicht kg (Soll)";
pub const COL_MEASURED_WEIGHT: &str = "Gewicht kg (Ist)";
pub const COL_REMARK: &str = "Bemerkung";

/// 旧形式（Soll/Ist区別なし）の列名
pub const LEGACY_COL_BIN: &str = "Fach";

pub const ROLL_LEDGER_HEADERS: &[&str] = &[
    COL_TIMESTAMP,
    COL_CODE,
    COL_MATERIAL,
    COL_SHORT_TEXT,
    COL_LENGTH,
    COL_REF_WIDTH,
    COL_MEASURED_WIDTH,
    COL_AREA,
    COL_REF_BIN,
    COL_MEASURED_BIN,
    COL_REMARK,
];

pub const GRANULATE_LEDGER_HEADERS: &[&str] = &[
    COL_TIMESTAMP,
    COL_CODE,
    COL_MATERIAL,
    COL_SHORT_TEXT,
    COL_REF_WEIGHT,
    COL_MEASURED_WEIGHT,
    COL_REMARK,
];

/// Charge列の位置（テキスト書式を付ける列）
pub const CODE_COLUMN_INDEX: u16 = 1;

/// 記録時刻の書式
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

pub fn ledger_headers(category: Category) -> &'static [&'static str] {
    match category {
        Category::Roll => ROLL_LEDGER_HEADERS,
        Category::Granulate => GRANULATE_LEDGER_HEADERS,
    }
}

pub fn ledger_sheet(found: bool) -> &'static str {
    if found {
        SHEET_FOUND
    } else {
        SHEET_NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_column_position() {
        for category in Category::ALL {
            assert_eq!(ledger_headers(category)[CODE_COLUMN_INDEX as usize], COL_CODE);
        }
    }
}
