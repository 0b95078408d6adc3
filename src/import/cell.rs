//! セル値の変換
//!
//! Chargeは文字列として扱う（先頭ゼロを保持、数値セルは末尾の ".0" を付けない）。

use crate::layout::TIMESTAMP_FORMAT;
use calamine::{Data, DataType};
use chrono::NaiveDateTime;
use inventur_common::validation::is_missing_marker;

/// セルを文字列に（欠損値は空文字）
pub fn cell_text(cell: Option<&Data>) -> String {
    let text = match cell {
        None | Some(Data::Empty) => return String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => float_text(*f),
        Some(Data::Int(i)) => i.to_string(),
        Some(other) => other.to_string().trim().to_string(),
    };
    if is_missing_marker(&text) {
        String::new()
    } else {
        text
    }
}

fn float_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// 数値セル（文字列の小数カンマにも対応）
pub fn cell_f64(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// 整数セル（小数部のある値は不可）
pub fn cell_u32(cell: Option<&Data>) -> Option<u32> {
    let value = cell_f64(cell)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value as u32)
}

/// 記録時刻セル
pub fn cell_datetime(cell: Option<&Data>) -> Option<NaiveDateTime> {
    match cell? {
        Data::String(s) => parse_timestamp(s),
        Data::Empty => None,
        other => other.as_datetime(),
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}
