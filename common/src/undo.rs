//! 取り消し履歴
//!
//! 直近の追加操作のみ保持する。上限を超えた古い履歴は破棄。

use crate::types::{Category, LedgerEntry};
use std::collections::VecDeque;

/// 保持する履歴の上限
pub const UNDO_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoAction {
    Add,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoRecord {
    pub action: UndoAction,
    pub entry: LedgerEntry,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct UndoStack {
    records: VecDeque<UndoRecord>,
    capacity: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_capacity(UNDO_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LedgerEntry, category: Category) {
        self.records.push_back(UndoRecord {
            action: UndoAction::Add,
            entry,
            category,
        });
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop_back()
    }

    /// 指定Chargeの履歴を破棄（削除済みエントリ用）
    pub fn discard(&mut self, code: &str) {
        self.records.retain(|r| r.entry.code != code);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
