//! 参照カタログ（Arbeitstabelle）
//!
//! 起動時に一度だけ読み込み、セッション中は変更しない。

use crate::types::{Category, GranulateReference, ReferenceRecord, RollReference};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rolls: Vec<RollReference>,
    /// グラニュレートシートがない場合はNone（単一カテゴリ運用）
    granulate: Option<Vec<GranulateReference>>,
}

impl Catalog {
    pub fn new(rolls: Vec<RollReference>, granulate: Option<Vec<GranulateReference>>) -> Self {
        Self { rolls, granulate }
    }

    pub fn rolls(&self) -> &[RollReference] {
        &self.rolls
    }

    pub fn granulate(&self) -> Option<&[GranulateReference]> {
        self.granulate.as_deref()
    }

    /// 利用可能なカテゴリ（照合の優先順）
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.has_category(*c))
            .collect()
    }

    pub fn has_category(&self, category: Category) -> bool {
        match category {
            Category::Roll => true,
            Category::Granulate => self.granulate.is_some(),
        }
    }

    pub fn len(&self) -> usize {
        self.rolls.len() + self.granulate.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 完全一致で検索（重複時は先頭行）
    pub fn find(&self, category: Category, code: &str) -> Option<ReferenceRecord> {
        match category {
            Category::Roll => self
                .rolls
                .iter()
                .find(|r| r.code == code)
                .cloned()
                .map(ReferenceRecord::Roll),
            Category::Granulate => self
                .granulate
                .as_ref()?
                .iter()
                .find(|g| g.code == code)
                .cloned()
                .map(ReferenceRecord::Granulate),
        }
    }
}
