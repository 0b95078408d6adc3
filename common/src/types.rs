//! 棚卸データの型定義
//!
//! - ReferenceRecord: Arbeitstabelle（参照カタログ）の1行
//! - ScanOutcome: スキャン照合結果
//! - LedgerEntry: 記録済みの棚卸エントリ（永続化単位）

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 品目カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Roll,
    Granulate,
}

impl Category {
    /// カタログ照合の優先順
    pub const ALL: [Category; 2] = [Category::Roll, Category::Granulate];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Roll => "Rolle",
            Category::Granulate => "Granulat",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ロールの参照データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollReference {
    pub code: String,
    pub material_id: String,
    pub short_text: String,
    pub length_m: f64,
    pub width_mm: u32,
    pub available_area_m2: f64,
    /// 参照上の棚番（空の場合あり）
    pub bin: Option<String>,
}

/// グラニュレートの参照データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GranulateReference {
    pub code: String,
    pub material_id: String,
    pub short_text: String,
    pub available_weight_kg: f64,
}

/// カタログの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ReferenceRecord {
    Roll(RollReference),
    Granulate(GranulateReference),
}

impl ReferenceRecord {
    pub fn category(&self) -> Category {
        match self {
            ReferenceRecord::Roll(_) => Category::Roll,
            ReferenceRecord::Granulate(_) => Category::Granulate,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ReferenceRecord::Roll(r) => &r.code,
            ReferenceRecord::Granulate(g) => &g.code,
        }
    }

    pub fn material_id(&self) -> &str {
        match self {
            ReferenceRecord::Roll(r) => &r.material_id,
            ReferenceRecord::Granulate(g) => &g.material_id,
        }
    }

    pub fn short_text(&self) -> &str {
        match self {
            ReferenceRecord::Roll(r) => &r.short_text,
            ReferenceRecord::Granulate(g) => &g.short_text,
        }
    }
}

/// スキャン照合結果
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// カタログに存在（codeは正規化後の値）
    Found { code: String, record: ReferenceRecord },
    /// カタログに存在しない
    NotFound { code: String },
}

impl ScanOutcome {
    pub fn code(&self) -> &str {
        match self {
            ScanOutcome::Found { code, .. } | ScanOutcome::NotFound { code } => code,
        }
    }
}

/// ロールの記録項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollDetails {
    pub length_m: Option<f64>,
    pub reference_width_mm: Option<u32>,
    pub measured_width_mm: u32,
    pub area_m2: Option<f64>,
    pub reference_bin: Option<String>,
    pub measured_bin: String,
}

/// グラニュレートの記録項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GranulateDetails {
    pub reference_weight_kg: Option<f64>,
    pub measured_weight_kg: f64,
}

/// カテゴリ別の記録項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum EntryDetails {
    Roll(RollDetails),
    Granulate(GranulateDetails),
}

impl EntryDetails {
    pub fn category(&self) -> Category {
        match self {
            EntryDetails::Roll(_) => Category::Roll,
            EntryDetails::Granulate(_) => Category::Granulate,
        }
    }
}

/// 棚卸エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub code: String,
    pub material_id: String,
    pub short_text: String,
    /// 記録時刻（追加時に確定）
    pub timestamp: NaiveDateTime,
    /// 備考（未入力は空文字）
    pub remark: String,
    /// カタログに存在したか
    pub found: bool,
    pub details: EntryDetails,
}

impl LedgerEntry {
    pub fn category(&self) -> Category {
        self.details.category()
    }

    /// 記録時の棚番（グラニュレートは空）
    pub fn bin(&self) -> &str {
        match &self.details {
            EntryDetails::Roll(r) => &r.measured_bin,
            EntryDetails::Granulate(_) => "",
        }
    }
}

/// オペレータが入力する実測値
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Roll { measured_bin: String, measured_width_mm: u32 },
    Granulate { measured_weight_kg: f64 },
}

impl Measurement {
    pub fn category(&self) -> Category {
        match self {
            Measurement::Roll { .. } => Category::Roll,
            Measurement::Granulate { .. } => Category::Granulate,
        }
    }
}

/// カタログ未登録品の手入力データ（検証済み）
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntry {
    pub material_id: String,
    pub short_text: String,
    pub remark: String,
    pub details: EntryDetails,
}
