//! 入力プロンプト
//!
//! どの入力欄でも `:c` でキャンセル（スキャン全体を破棄）。

use crate::error::Result;
use dialoguer::{Confirm, Input, Select};
use inventur_common::validation::{
    normalize_remark, require_text, FIELD_BIN, FIELD_REMARK, FIELD_WEIGHT, FIELD_WIDTH,
};
use inventur_common::{
    validate_weight, validate_width, Category, Error, ManualEntry, ManualEntryForm, Measurement,
    ReferenceRecord,
};

pub const CANCEL_INPUT: &str = ":c";

/// 入力（キャンセル時はNone）
pub fn prompt_text(label: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?;

    if input.trim() == CANCEL_INPUT {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// 検証に通るまで再入力
pub fn prompt_validated<T>(
    label: &str,
    validate: impl Fn(&str) -> inventur_common::Result<T>,
) -> Result<Option<T>> {
    loop {
        let Some(text) = prompt_text(label)? else {
            return Ok(None);
        };
        match validate(&text) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => println!("  ✗ {}", e),
        }
    }
}

pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// カタログ登録品の実測値入力
pub fn prompt_measurement(record: &ReferenceRecord) -> Result<Option<(Measurement, String)>> {
    let measurement = match record {
        ReferenceRecord::Roll(r) => {
            let bin_label = match &r.bin {
                Some(bin) => format!("{} (Soll: {})", FIELD_BIN, bin),
                None => FIELD_BIN.to_string(),
            };
            let Some(measured_bin) = prompt_validated(&bin_label, |t| require_text(t, FIELD_BIN))?
            else {
                return Ok(None);
            };
            let width_label = format!("{} mm (Soll: {})", FIELD_WIDTH, r.width_mm);
            let Some(measured_width_mm) = prompt_validated(&width_label, validate_width)? else {
                return Ok(None);
            };
            Measurement::Roll {
                measured_bin,
                measured_width_mm,
            }
        }
        ReferenceRecord::Granulate(g) => {
            let label = format!("{} kg (Soll: {:.2})", FIELD_WEIGHT, g.available_weight_kg);
            let Some(measured_weight_kg) = prompt_validated(&label, validate_weight)? else {
                return Ok(None);
            };
            Measurement::Granulate { measured_weight_kg }
        }
    };

    let Some(remark) = prompt_text(FIELD_REMARK)? else {
        return Ok(None);
    };
    Ok(Some((measurement, normalize_remark(&remark))))
}

/// 手入力のカテゴリ選択（1カテゴリのみなら選択なし）
pub fn prompt_category(categories: &[Category]) -> Result<Option<Category>> {
    if categories.len() <= 1 {
        return Ok(categories.first().copied());
    }
    let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();
    let selection = Select::new()
        .with_prompt("Kategorie (Esc: キャンセル)")
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(selection.map(|idx| categories[idx]))
}

/// カタログ未登録品の手入力
///
/// 検証エラーは該当項目だけを再入力させる。
pub fn prompt_manual_entry(code: &str, categories: &[Category]) -> Result<Option<ManualEntry>> {
    println!("⚠ Charge {} はArbeitstabelleにありません。手入力してください（:c でキャンセル）", code);

    let Some(category) = prompt_category(categories)? else {
        return Ok(None);
    };

    let mut form = ManualEntryForm::new(category);
    for field in ManualEntryForm::input_fields(category) {
        let label = if form.is_required(field) {
            format!("{} *", field)
        } else {
            field.to_string()
        };
        let Some(value) = prompt_text(&label)? else {
            return Ok(None);
        };
        if let Some(slot) = form.field_mut(field) {
            *slot = value;
        }
    }

    loop {
        match form.validate() {
            Ok(entry) => return Ok(Some(entry)),
            Err(Error::Field { field, message }) => {
                println!("  ✗ {} {}", field, message);
                let Some(value) = prompt_text(&format!("{} *", field))? else {
                    return Ok(None);
                };
                if let Some(slot) = form.field_mut(&field) {
                    *slot = value;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}
