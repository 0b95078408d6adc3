//! 一覧・照合結果の表示

use inventur_common::{
    EntryDetails, FlushStatus, Ledger, LedgerEntry, Receipt, ReferenceRecord,
};

/// 一覧で表示する品名の最大文字数
const SHORT_TEXT_MAX: usize = 30;

/// 文字数で切り詰め（超過分は "..."）
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn status_label(entry: &LedgerEntry) -> &'static str {
    if entry.found {
        "✅ Gefunden"
    } else {
        "⚠️ Nicht gefunden"
    }
}

/// 一覧の1行
pub fn format_entry_row(entry: &LedgerEntry) -> String {
    let measured = match &entry.details {
        EntryDetails::Roll(r) => format!("{} mm", r.measured_width_mm),
        EntryDetails::Granulate(g) => format!("{:.2} kg", g.measured_weight_kg),
    };
    format!(
        "{}  {:<12} {:<10} {:<30} {:<8} {:<10} {:<10} {} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.code,
        entry.material_id,
        truncate_text(&entry.short_text, SHORT_TEXT_MAX),
        entry.category().label(),
        entry.bin(),
        measured,
        status_label(entry),
        entry.remark,
    )
}

/// 記録済み一覧（新しい順）
pub fn print_entries(ledger: &Ledger) {
    let entries = ledger.all_entries();
    println!(
        "{:<8}  {:<12} {:<10} {:<30} {:<8} {:<10} {:<10} Status",
        "Zeit", "Charge", "Material", "Materialkurztext", "Art", "Fach", "Ist"
    );
    for entry in &entries {
        println!("{}", format_entry_row(entry));
    }
    println!("--- {} Artikel", entries.len());
}

/// 照合できた参照データ
pub fn print_record(code: &str, record: &ReferenceRecord) {
    println!("✔ Ware gefunden ({})", record.category());
    println!("  Charge:           {}", code);
    println!("  Material:         {}", record.material_id());
    println!("  Materialkurztext: {}", record.short_text());
    match record {
        ReferenceRecord::Roll(r) => {
            println!("  Länge:            {:.2} m", r.length_m);
            println!("  Breite:           {} mm", r.width_mm);
            println!("  Fläche:           {:.2} m²", r.available_area_m2);
            if let Some(bin) = &r.bin {
                println!("  Lagerplatz:       {}", bin);
            }
        }
        ReferenceRecord::Granulate(g) => {
            println!("  Frei verwendbar:  {:.2} kg", g.available_weight_kg);
        }
    }
}

/// 操作結果のメッセージ
pub fn receipt_message(action: &str, receipt: &Receipt) -> String {
    let flush = match &receipt.flush {
        FlushStatus::Written => "保存済み".to_string(),
        FlushStatus::Skipped => "未保存（:s で保存）".to_string(),
        FlushStatus::Failed(e) => format!("⚠ 保存失敗: {}", e),
    };
    format!(
        "✔ {}: {} （合計 {}件, {}）",
        action, receipt.code, receipt.total, flush
    )
}
