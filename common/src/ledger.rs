//! セッション台帳
//!
//! カテゴリ × 照合結果ごとの追記専用リスト。Chargeは全リストを通して一意。

use crate::error::{Error, Result};
use crate::types::{Category, LedgerEntry};

#[derive(Debug, Clone, Default, PartialEq)]
struct Partition {
    found: Vec<LedgerEntry>,
    not_found: Vec<LedgerEntry>,
}

impl Partition {
    fn list(&self, found: bool) -> &[LedgerEntry] {
        if found {
            &self.found
        } else {
            &self.not_found
        }
    }

    fn list_mut(&mut self, found: bool) -> &mut Vec<LedgerEntry> {
        if found {
            &mut self.found
        } else {
            &mut self.not_found
        }
    }

    fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.found.iter().chain(self.not_found.iter())
    }

    fn remove(&mut self, code: &str) -> Option<LedgerEntry> {
        for list in [&mut self.found, &mut self.not_found] {
            if let Some(pos) = list.iter().position(|e| e.code == code) {
                return Some(list.remove(pos));
            }
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rolls: Partition,
    granulate: Partition,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, category: Category) -> &Partition {
        match category {
            Category::Roll => &self.rolls,
            Category::Granulate => &self.granulate,
        }
    }

    fn partition_mut(&mut self, category: Category) -> &mut Partition {
        match category {
            Category::Roll => &mut self.rolls,
            Category::Granulate => &mut self.granulate,
        }
    }

    /// 既に記録済みか（全カテゴリ・全リストを線形走査）
    pub fn is_duplicate(&self, code: &str) -> bool {
        self.iter().any(|e| e.code == code)
    }

    /// エントリを追加（重複Chargeは拒否）
    pub fn append(&mut self, entry: LedgerEntry) -> Result<()> {
        if self.is_duplicate(&entry.code) {
            return Err(Error::Duplicate(entry.code));
        }
        let found = entry.found;
        self.partition_mut(entry.category())
            .list_mut(found)
            .push(entry);
        Ok(())
    }

    /// 全リストからChargeを削除
    pub fn delete(&mut self, code: &str) -> Option<LedgerEntry> {
        let mut removed = None;
        for category in Category::ALL {
            while let Some(entry) = self.partition_mut(category).remove(code) {
                removed.get_or_insert(entry);
            }
        }
        removed
    }

    /// 指定カテゴリからChargeを削除（取り消し用）
    pub fn remove(&mut self, code: &str, category: Category) -> Option<LedgerEntry> {
        self.partition_mut(category).remove(code)
    }

    pub fn entries(&self, category: Category, found: bool) -> &[LedgerEntry] {
        self.partition(category).list(found)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.rolls.iter().chain(self.granulate.iter())
    }

    /// 表示用: 記録時刻の降順
    pub fn all_entries(&self) -> Vec<&LedgerEntry> {
        let mut entries: Vec<&LedgerEntry> = self.iter().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// カテゴリにエントリがあるか
    pub fn has_entries(&self, category: Category) -> bool {
        self.partition(category).iter().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryDetails, GranulateDetails, RollDetails};
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 20)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn roll_entry(code: &str, found: bool, ts: chrono::NaiveDateTime) -> LedgerEntry {
        LedgerEntry {
            code: code.into(),
            material_id: "M1".into(),
            short_text: "Band".into(),
            timestamp: ts,
            remark: String::new(),
            found,
            details: EntryDetails::Roll(RollDetails {
                length_m: Some(10.0),
                reference_width_mm: Some(600),
                measured_width_mm: 598,
                area_m2: Some(6.0),
                reference_bin: None,
                measured_bin: "F-01".into(),
            }),
        }
    }

    fn granulate_entry(code: &str, found: bool, ts: chrono::NaiveDateTime) -> LedgerEntry {
        LedgerEntry {
            code: code.into(),
            material_id: "G1".into(),
            short_text: "PVC".into(),
            timestamp: ts,
            remark: String::new(),
            found,
            details: EntryDetails::Granulate(GranulateDetails {
                reference_weight_kg: None,
                measured_weight_kg: 12.5,
            }),
        }
    }

    #[test]
    fn test_append_routes_by_category_and_outcome() {
        let mut ledger = Ledger::new();
        ledger.append(roll_entry("1", true, at(8, 0))).unwrap();
        ledger.append(roll_entry("2", false, at(8, 1))).unwrap();
        ledger.append(granulate_entry("3", true, at(8, 2))).unwrap();

        assert_eq!(ledger.entries(Category::Roll, true).len(), 1);
        assert_eq!(ledger.entries(Category::Roll, false).len(), 1);
        assert_eq!(ledger.entries(Category::Granulate, true).len(), 1);
        assert!(ledger.entries(Category::Granulate, false).is_empty());
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_duplicate_across_categories_rejected() {
        let mut ledger = Ledger::new();
        ledger.append(roll_entry("A100", false, at(9, 0))).unwrap();

        assert!(ledger.is_duplicate("A100"));
        let err = ledger
            .append(granulate_entry("A100", true, at(9, 1)))
            .unwrap_err();
        assert_eq!(err, Error::Duplicate("A100".into()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_delete_searches_all_lists() {
        let mut ledger = Ledger::new();
        ledger.append(roll_entry("1", true, at(8, 0))).unwrap();
        ledger.append(granulate_entry("2", false, at(8, 1))).unwrap();

        let removed = ledger.delete("2").expect("not removed");
        assert_eq!(removed.code, "2");
        assert!(!ledger.has_entries(Category::Granulate));
        assert!(ledger.delete("2").is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_respects_category() {
        let mut ledger = Ledger::new();
        ledger.append(roll_entry("1", true, at(8, 0))).unwrap();

        assert!(ledger.remove("1", Category::Granulate).is_none());
        assert!(ledger.remove("1", Category::Roll).is_some());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_all_entries_newest_first() {
        let mut ledger = Ledger::new();
        ledger.append(roll_entry("old", true, at(7, 0))).unwrap();
        ledger.append(granulate_entry("new", true, at(12, 0))).unwrap();
        ledger.append(roll_entry("mid", false, at(9, 30))).unwrap();

        let codes: Vec<&str> = ledger.all_entries().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["new", "mid", "old"]);
    }
}
