//! Inventur Common Library
//!
//! 参照カタログ照合・重複チェック・台帳・取り消しのドメインロジック。
//! ファイル入出力は持たず、永続化は `LedgerStore` 経由で行う。

pub mod types;
pub mod error;
pub mod catalog;
pub mod resolver;
pub mod ledger;
pub mod undo;
pub mod validation;
pub mod session;

pub use types::{
    Category, EntryDetails, GranulateDetails, GranulateReference, LedgerEntry, ManualEntry,
    Measurement, ReferenceRecord, RollDetails, RollReference, ScanOutcome,
};
pub use error::{Error, Result};
pub use catalog::Catalog;
pub use resolver::resolve;
pub use ledger::Ledger;
pub use undo::{UndoStack, UNDO_CAPACITY};
pub use validation::{validate_weight, validate_width, ManualEntryForm};
pub use session::{FlushStatus, LedgerStore, Receipt, Session};
