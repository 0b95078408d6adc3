//! スキャン照合
//!
//! 完全一致 → 先頭ゼロ除去（整数として再文字列化）の順で照合する。

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::types::ScanOutcome;

/// スキャン文字列の前後空白を除去（空はエラー）
pub fn canonical_input(raw_code: &str) -> Result<&str> {
    let code = raw_code.trim();
    if code.is_empty() {
        return Err(Error::EmptyCode);
    }
    Ok(code)
}

/// 先頭ゼロを除去したコード（整数として解釈できない場合はNone）
pub fn strip_leading_zeros(code: &str) -> Option<String> {
    code.parse::<i64>().ok().map(|n| n.to_string())
}

/// カタログ照合
pub fn resolve(catalog: &Catalog, raw_code: &str) -> Result<ScanOutcome> {
    let code = canonical_input(raw_code)?;

    if let Some(outcome) = lookup(catalog, code) {
        return Ok(outcome);
    }

    // 完全一致なし → 先頭ゼロを除去して再照合
    if let Some(normalized) = strip_leading_zeros(code) {
        if normalized != code {
            if let Some(outcome) = lookup(catalog, &normalized) {
                return Ok(outcome);
            }
        }
    }

    Ok(ScanOutcome::NotFound {
        code: code.to_string(),
    })
}

fn lookup(catalog: &Catalog, code: &str) -> Option<ScanOutcome> {
    catalog
        .categories()
        .into_iter()
        .find_map(|category| catalog.find(category, code))
        .map(|record| ScanOutcome::Found {
            code: code.to_string(),
            record,
        })
}
