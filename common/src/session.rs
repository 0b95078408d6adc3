//! スキャンワークフロー
//!
//! オペレータ操作ごとに1つの操作（scan / record_found / record_manual /
//! delete / undo / save）を提供し、表示側は戻り値だけを描画する。

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::resolver::{canonical_input, resolve};
use crate::types::{
    EntryDetails, GranulateDetails, LedgerEntry, ManualEntry, Measurement, ReferenceRecord,
    RollDetails, ScanOutcome,
};
use crate::undo::UndoStack;
use crate::validation::{normalize_remark, require_text, FIELD_BIN, FIELD_WEIGHT, FIELD_WIDTH};
use crate::validation::{MAX_WIDTH_MM, MIN_WIDTH_MM};
use chrono::{Local, NaiveDateTime, SubsecRound};
use std::fmt::Display;

/// 台帳の永続化先
pub trait LedgerStore {
    type Error: Display;

    /// 台帳全体を書き出す（毎回全件書き直し）
    fn flush(&mut self, ledger: &Ledger) -> std::result::Result<(), Self::Error>;
}

/// 書き出し結果
#[derive(Debug, Clone, PartialEq)]
pub enum FlushStatus {
    /// 自動保存オフ
    Skipped,
    Written,
    /// 書き出し失敗（メモリ上の台帳は保持）
    Failed(String),
}

/// 操作結果
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub code: String,
    pub total: usize,
    pub flush: FlushStatus,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub struct Session<S: LedgerStore> {
    catalog: Catalog,
    ledger: Ledger,
    undo: UndoStack,
    store: S,
    auto_save: bool,
    clock: fn() -> NaiveDateTime,
}

impl<S: LedgerStore> Session<S> {
    /// `ledger` は既存の棚卸ファイルから読み込んだ内容
    pub fn new(catalog: Catalog, ledger: Ledger, store: S, auto_save: bool) -> Self {
        Self {
            catalog,
            ledger,
            undo: UndoStack::new(),
            store,
            auto_save,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn set_auto_save(&mut self, auto_save: bool) {
        self.auto_save = auto_save;
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// スキャン: 重複チェック → カタログ照合
    ///
    /// 状態は変更しない。重複時は `Error::Duplicate`。
    pub fn scan(&self, raw_code: &str) -> Result<ScanOutcome> {
        let code = canonical_input(raw_code)?;
        if self.ledger.is_duplicate(code) {
            return Err(Error::Duplicate(code.to_string()));
        }

        let outcome = resolve(&self.catalog, code)?;

        // 先頭ゼロ除去で別のChargeに正規化された場合も重複扱い
        if outcome.code() != code && self.ledger.is_duplicate(outcome.code()) {
            return Err(Error::Duplicate(outcome.code().to_string()));
        }
        Ok(outcome)
    }

    /// カタログ登録品を記録
    pub fn record_found(
        &mut self,
        code: &str,
        record: &ReferenceRecord,
        measurement: Measurement,
        remark: &str,
    ) -> Result<Receipt> {
        let details = match (record, measurement) {
            (
                ReferenceRecord::Roll(r),
                Measurement::Roll {
                    measured_bin,
                    measured_width_mm,
                },
            ) => {
                if !(MIN_WIDTH_MM..=MAX_WIDTH_MM).contains(&measured_width_mm) {
                    return Err(Error::field(
                        FIELD_WIDTH,
                        format!("must be between {} and {}", MIN_WIDTH_MM, MAX_WIDTH_MM),
                    ));
                }
                EntryDetails::Roll(RollDetails {
                    length_m: Some(r.length_m),
                    reference_width_mm: Some(r.width_mm),
                    measured_width_mm,
                    area_m2: Some(r.available_area_m2),
                    reference_bin: r.bin.clone(),
                    measured_bin: require_text(&measured_bin, FIELD_BIN)?,
                })
            }
            (ReferenceRecord::Granulate(g), Measurement::Granulate { measured_weight_kg }) => {
                if !(measured_weight_kg > 0.0) {
                    return Err(Error::field(FIELD_WEIGHT, "must be greater than 0"));
                }
                EntryDetails::Granulate(GranulateDetails {
                    reference_weight_kg: Some(g.available_weight_kg),
                    measured_weight_kg,
                })
            }
            (record, measurement) => {
                return Err(Error::CategoryMismatch {
                    expected: record.category(),
                    given: measurement.category(),
                })
            }
        };

        let entry = LedgerEntry {
            code: code.to_string(),
            material_id: record.material_id().to_string(),
            short_text: record.short_text().to_string(),
            timestamp: (self.clock)(),
            remark: normalize_remark(remark),
            found: true,
            details,
        };
        self.commit(entry)
    }

    /// カタログ未登録品を記録
    pub fn record_manual(&mut self, code: &str, manual: ManualEntry) -> Result<Receipt> {
        let category = manual.details.category();
        if !self.catalog.has_category(category) {
            return Err(Error::CategoryUnavailable(category));
        }

        let entry = LedgerEntry {
            code: canonical_input(code)?.to_string(),
            material_id: manual.material_id,
            short_text: manual.short_text,
            timestamp: (self.clock)(),
            remark: manual.remark,
            found: false,
            details: manual.details,
        };
        self.commit(entry)
    }

    fn commit(&mut self, entry: LedgerEntry) -> Result<Receipt> {
        let code = entry.code.clone();
        let category = entry.category();

        self.ledger.append(entry.clone())?;
        self.undo.push(entry, category);

        let flush = if self.auto_save {
            self.flush()
        } else {
            FlushStatus::Skipped
        };
        Ok(self.receipt(code, flush))
    }

    /// Chargeを削除（該当なしはNone）
    pub fn delete(&mut self, code: &str) -> Option<Receipt> {
        let removed = self.ledger.delete(code.trim())?;
        self.undo.discard(&removed.code);
        let flush = self.flush();
        Some(self.receipt(removed.code, flush))
    }

    /// 直前の追加を取り消す（履歴なし、または既に台帳にない場合はNone）
    pub fn undo(&mut self) -> Option<Receipt> {
        let record = self.undo.pop()?;
        self.ledger.remove(&record.entry.code, record.category)?;
        let flush = self.flush();
        Some(self.receipt(record.entry.code, flush))
    }

    /// 手動保存
    pub fn save(&mut self) -> std::result::Result<(), S::Error> {
        self.store.flush(&self.ledger)
    }

    fn flush(&mut self) -> FlushStatus {
        match self.store.flush(&self.ledger) {
            Ok(()) => FlushStatus::Written,
            Err(e) => FlushStatus::Failed(e.to_string()),
        }
    }

    fn receipt(&self, code: String, flush: FlushStatus) -> Receipt {
        Receipt {
            code,
            total: self.ledger.len(),
            flush,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, GranulateReference, RollReference};
    use crate::validation::ManualEntryForm;
    use chrono::NaiveDate;

    /// 書き出し内容を記録するだけのストア
    #[derive(Default)]
    struct MemoryStore {
        flushes: Vec<usize>,
        fail: bool,
    }

    impl LedgerStore for MemoryStore {
        type Error = String;

        fn flush(&mut self, ledger: &Ledger) -> std::result::Result<(), String> {
            if self.fail {
                return Err("disk full".into());
            }
            self.flushes.push(ledger.len());
            Ok(())
        }
    }

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                RollReference {
                    code: "A100".into(),
                    material_id: "1000123".into(),
                    short_text: "Transportband".into(),
                    length_m: 50.0,
                    width_mm: 1200,
                    available_area_m2: 60.0,
                    bin: Some("F-07".into()),
                },
                RollReference {
                    code: "7".into(),
                    material_id: "1000124".into(),
                    short_text: "Flachriemen".into(),
                    length_m: 20.0,
                    width_mm: 300,
                    available_area_m2: 6.0,
                    bin: None,
                },
            ],
            Some(vec![GranulateReference {
                code: "G-1".into(),
                material_id: "2000001".into(),
                short_text: "PVC Granulat".into(),
                available_weight_kg: 25.0,
            }]),
        )
    }

    fn session(auto_save: bool) -> Session<MemoryStore> {
        Session::new(catalog(), Ledger::new(), MemoryStore::default(), auto_save)
            .with_clock(fixed_clock)
    }

    fn roll_measurement() -> Measurement {
        Measurement::Roll {
            measured_bin: "F-08".into(),
            measured_width_mm: 1198,
        }
    }

    fn record_scan(session: &mut Session<MemoryStore>, raw: &str) -> Result<Receipt> {
        match session.scan(raw)? {
            ScanOutcome::Found { code, record } => {
                session.record_found(&code, &record, roll_measurement(), "")
            }
            ScanOutcome::NotFound { code } => panic!("{} not found", code),
        }
    }

    #[test]
    fn test_duplicate_scan_rejected_end_to_end() {
        let mut session = session(true);
        record_scan(&mut session, "A100").unwrap();

        assert_eq!(
            session.scan("A100"),
            Err(Error::Duplicate("A100".into()))
        );
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.store().flushes, vec![1]);
    }

    #[test]
    fn test_duplicate_after_leading_zero_normalization() {
        let mut session = session(true);
        record_scan(&mut session, "007").unwrap();

        assert!(session.ledger().is_duplicate("7"));
        assert_eq!(session.scan("0007"), Err(Error::Duplicate("7".into())));
        assert_eq!(session.scan("7"), Err(Error::Duplicate("7".into())));
    }

    #[test]
    fn test_found_roll_copies_reference_fields() {
        let mut session = session(true);
        let receipt = record_scan(&mut session, "A100").unwrap();
        assert_eq!(receipt.total, 1);
        assert_eq!(receipt.flush, FlushStatus::Written);

        let entry = &session.ledger().entries(Category::Roll, true)[0];
        assert_eq!(entry.timestamp, fixed_clock());
        match &entry.details {
            EntryDetails::Roll(r) => {
                assert_eq!(r.reference_width_mm, Some(1200));
                assert_eq!(r.measured_width_mm, 1198);
                assert_eq!(r.reference_bin.as_deref(), Some("F-07"));
                assert_eq!(r.measured_bin, "F-08");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_category_mismatch() {
        let mut session = session(true);
        let outcome = session.scan("G-1").unwrap();
        let ScanOutcome::Found { code, record } = outcome else {
            panic!("G-1 not found");
        };
        let err = session
            .record_found(&code, &record, roll_measurement(), "")
            .unwrap_err();
        assert!(matches!(err, Error::CategoryMismatch { .. }));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_undo_reverses_append() {
        let mut session = session(true);
        record_scan(&mut session, "A100").unwrap();
        let before = session.ledger().clone();

        let outcome = session.scan("G-1").unwrap();
        let ScanOutcome::Found { code, record } = outcome else {
            panic!("G-1 not found");
        };
        session
            .record_found(
                &code,
                &record,
                Measurement::Granulate {
                    measured_weight_kg: 24.5,
                },
                "Sack offen",
            )
            .unwrap();
        assert_eq!(session.ledger().len(), 2);

        let receipt = session.undo().expect("nothing undone");
        assert_eq!(receipt.code, "G-1");
        assert_eq!(session.ledger(), &before);
    }

    #[test]
    fn test_undo_empty_has_no_side_effects() {
        let mut session = session(true);
        assert!(session.undo().is_none());
        assert!(session.store().flushes.is_empty());
    }

    #[test]
    fn test_undo_after_delete_skips_removed_entry() {
        let mut session = session(true);
        record_scan(&mut session, "7").unwrap();
        record_scan(&mut session, "A100").unwrap();

        session.delete("A100").expect("A100 not deleted");
        assert_eq!(session.undo_depth(), 1);

        // 削除済みのA100ではなく、その前の追加を取り消す
        let receipt = session.undo().expect("nothing undone");
        assert_eq!(receipt.code, "7");
        assert!(session.ledger().is_empty());

        let flushes = session.store().flushes.len();
        assert!(session.undo().is_none());
        assert_eq!(session.store().flushes.len(), flushes);
    }

    #[test]
    fn test_manual_entry_recorded_as_not_found() {
        let mut session = session(true);
        let outcome = session.scan("X-999").unwrap();
        assert_eq!(outcome, ScanOutcome::NotFound { code: "X-999".into() });

        let manual = ManualEntryForm {
            material_id: "2000002".into(),
            weight_kg: "7,5".into(),
            ..ManualEntryForm::new(Category::Granulate)
        }
        .validate()
        .unwrap();
        session.record_manual(outcome.code(), manual).unwrap();

        let entries = session.ledger().entries(Category::Granulate, false);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].found);
        assert_eq!(session.scan("X-999"), Err(Error::Duplicate("X-999".into())));
    }

    #[test]
    fn test_manual_granulate_needs_granulate_catalog() {
        let mut session = Session::new(
            Catalog::new(catalog().rolls().to_vec(), None),
            Ledger::new(),
            MemoryStore::default(),
            true,
        );
        let manual = ManualEntryForm {
            material_id: "1".into(),
            weight_kg: "1".into(),
            ..ManualEntryForm::new(Category::Granulate)
        }
        .validate()
        .unwrap();
        assert_eq!(
            session.record_manual("Z1", manual),
            Err(Error::CategoryUnavailable(Category::Granulate))
        );
    }

    #[test]
    fn test_auto_save_off_skips_append_flush() {
        let mut session = session(false);
        let receipt = record_scan(&mut session, "A100").unwrap();
        assert_eq!(receipt.flush, FlushStatus::Skipped);
        assert!(session.store().flushes.is_empty());

        session.save().unwrap();
        assert_eq!(session.store().flushes, vec![1]);
    }

    #[test]
    fn test_delete_always_flushes() {
        let mut session = session(false);
        record_scan(&mut session, "A100").unwrap();

        let receipt = session.delete("A100").expect("not deleted");
        assert_eq!(receipt.total, 0);
        assert_eq!(receipt.flush, FlushStatus::Written);
        assert!(session.delete("A100").is_none());
    }

    #[test]
    fn test_flush_failure_keeps_ledger() {
        let mut session = Session::new(
            catalog(),
            Ledger::new(),
            MemoryStore {
                fail: true,
                ..Default::default()
            },
            true,
        );
        let receipt = record_scan(&mut session, "A100").unwrap();
        assert_eq!(receipt.flush, FlushStatus::Failed("disk full".into()));
        assert_eq!(session.ledger().len(), 1);
        assert!(session.save().is_err());
    }

    #[test]
    fn test_invalid_measurement_rejected() {
        let mut session = session(true);
        let ScanOutcome::Found { code, record } = session.scan("A100").unwrap() else {
            panic!("A100 not found");
        };
        let err = session
            .record_found(
                &code,
                &record,
                Measurement::Roll {
                    measured_bin: "  ".into(),
                    measured_width_mm: 1000,
                },
                "",
            )
            .unwrap_err();
        assert_eq!(err, Error::field(FIELD_BIN, "is required"));
        assert!(session.ledger().is_empty());
        assert_eq!(session.undo_depth(), 0);
    }
}
