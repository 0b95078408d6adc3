//! 入力値の検証
//!
//! 保存時に呼ばれる。失敗した項目だけを再入力させる前提。

use crate::error::{Error, Result};
use crate::types::{Category, EntryDetails, GranulateDetails, ManualEntry, RollDetails};

pub const FIELD_MATERIAL: &str = "Material";
pub const FIELD_LENGTH: &str = "Länge";
pub const FIELD_WIDTH: &str = "Breite";
pub const FIELD_AREA: &str = "Fläche";
pub const FIELD_BIN: &str = "Fach";
pub const FIELD_WEIGHT: &str = "Gewicht";
pub const FIELD_SHORT_TEXT: &str = "Materialkurztext";
pub const FIELD_REMARK: &str = "Bemerkung";

pub const MIN_WIDTH_MM: u32 = 1;
pub const MAX_WIDTH_MM: u32 = 9999;

const NOT_A_NUMBER: &str = "must be a valid number";

/// 実測幅（mm, 1〜9999）
pub fn validate_width(text: &str) -> Result<u32> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| Error::field(FIELD_WIDTH, NOT_A_NUMBER))?;

    if value < MIN_WIDTH_MM as i64 || value > MAX_WIDTH_MM as i64 {
        return Err(Error::field(
            FIELD_WIDTH,
            format!("must be between {} and {}", MIN_WIDTH_MM, MAX_WIDTH_MM),
        ));
    }
    Ok(value as u32)
}

/// 実測重量（kg, 0より大きい）
pub fn validate_weight(text: &str) -> Result<f64> {
    let value = parse_decimal(text, FIELD_WEIGHT)?;
    if value <= 0.0 {
        return Err(Error::field(FIELD_WEIGHT, "must be greater than 0"));
    }
    Ok(value)
}

/// 小数（カンマ・ピリオド両対応）
pub fn parse_decimal(text: &str, field: &str) -> Result<f64> {
    let normalized = text.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::field(field, NOT_A_NUMBER)),
    }
}

/// 必須の文字列項目
pub fn require_text(text: &str, field: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::field(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// 備考の正規化（"nan" 等の欠損表現は空文字）
pub fn normalize_remark(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_missing_marker(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// 表計算由来の欠損値表現か
pub fn is_missing_marker(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("nan") || v.eq_ignore_ascii_case("none")
}

/// カタログ未登録品の入力フォーム（未検証の生文字列）
#[derive(Debug, Clone)]
pub struct ManualEntryForm {
    pub category: Category,
    pub material_id: String,
    pub short_text: String,
    pub length_m: String,
    pub width_mm: String,
    pub area_m2: String,
    pub bin: String,
    pub weight_kg: String,
    pub remark: String,
}

impl ManualEntryForm {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            material_id: String::new(),
            short_text: String::new(),
            length_m: String::new(),
            width_mm: String::new(),
            area_m2: String::new(),
            bin: String::new(),
            weight_kg: String::new(),
            remark: String::new(),
        }
    }

    /// カテゴリごとの必須項目
    pub fn required_fields(category: Category) -> &'static [&'static str] {
        match category {
            Category::Roll => &[FIELD_MATERIAL, FIELD_LENGTH, FIELD_WIDTH, FIELD_AREA, FIELD_BIN],
            Category::Granulate => &[FIELD_MATERIAL, FIELD_WEIGHT],
        }
    }

    /// 入力順の項目一覧（任意項目を含む）
    pub fn input_fields(category: Category) -> &'static [&'static str] {
        match category {
            Category::Roll => &[
                FIELD_MATERIAL,
                FIELD_SHORT_TEXT,
                FIELD_LENGTH,
                FIELD_WIDTH,
                FIELD_AREA,
                FIELD_BIN,
                FIELD_REMARK,
            ],
            Category::Granulate => &[FIELD_MATERIAL, FIELD_SHORT_TEXT, FIELD_WEIGHT, FIELD_REMARK],
        }
    }

    pub fn is_required(&self, field: &str) -> bool {
        Self::required_fields(self.category)
            .iter()
            .any(|f| *f == field)
    }

    fn value(&self, field: &str) -> &str {
        match field {
            FIELD_MATERIAL => &self.material_id,
            FIELD_SHORT_TEXT => &self.short_text,
            FIELD_LENGTH => &self.length_m,
            FIELD_WIDTH => &self.width_mm,
            FIELD_AREA => &self.area_m2,
            FIELD_BIN => &self.bin,
            FIELD_WEIGHT => &self.weight_kg,
            FIELD_REMARK => &self.remark,
            _ => "",
        }
    }

    /// 項目名から入力欄を取得（再入力用）
    pub fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            FIELD_MATERIAL => Some(&mut self.material_id),
            FIELD_SHORT_TEXT => Some(&mut self.short_text),
            FIELD_LENGTH => Some(&mut self.length_m),
            FIELD_WIDTH => Some(&mut self.width_mm),
            FIELD_AREA => Some(&mut self.area_m2),
            FIELD_BIN => Some(&mut self.bin),
            FIELD_WEIGHT => Some(&mut self.weight_kg),
            FIELD_REMARK => Some(&mut self.remark),
            _ => None,
        }
    }

    /// 必須チェック → 数値変換の順に検証
    pub fn validate(&self) -> Result<ManualEntry> {
        for field in Self::required_fields(self.category) {
            require_text(self.value(field), field)?;
        }

        let details = match self.category {
            Category::Roll => EntryDetails::Roll(RollDetails {
                length_m: Some(parse_decimal(&self.length_m, FIELD_LENGTH)?),
                reference_width_mm: None,
                measured_width_mm: validate_width(&self.width_mm)?,
                area_m2: Some(parse_decimal(&self.area_m2, FIELD_AREA)?),
                reference_bin: None,
                measured_bin: require_text(&self.bin, FIELD_BIN)?,
            }),
            Category::Granulate => EntryDetails::Granulate(GranulateDetails {
                reference_weight_kg: None,
                measured_weight_kg: validate_weight(&self.weight_kg)?,
            }),
        };

        Ok(ManualEntry {
            material_id: self.material_id.trim().to_string(),
            short_text: self.short_text.trim().to_string(),
            remark: normalize_remark(&self.remark),
            details,
        })
    }
}
