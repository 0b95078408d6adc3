pub mod excel;
pub mod backup;

use crate::config::Config;
use crate::error::{InventurError, Result};
use inventur_common::{Catalog, Category, Ledger, LedgerStore};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 一時ファイルに書いてから置き換える
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| InventurError::ExcelWrite(format!("不正な出力先: {}", path.display())))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|_| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(InventurError::ExcelWrite(format!("{}: {}", path.display(), e)));
    }
    Ok(())
}

/// 棚卸ファイル（xlsx）への保存
#[derive(Debug, Clone)]
pub struct XlsxLedgerStore {
    roll_path: PathBuf,
    granulate_path: PathBuf,
    /// グラニュレートのブックを常に書き出すか
    granulate_enabled: bool,
}

impl XlsxLedgerStore {
    pub fn new(roll_path: PathBuf, granulate_path: PathBuf, granulate_enabled: bool) -> Self {
        Self {
            roll_path,
            granulate_path,
            granulate_enabled,
        }
    }

    pub fn from_config(config: &Config, catalog: &Catalog) -> Self {
        Self::new(
            config.roll_ledger_path(),
            config.granulate_ledger_path(),
            catalog.has_category(Category::Granulate),
        )
    }

    pub fn path(&self, category: Category) -> &Path {
        match category {
            Category::Roll => &self.roll_path,
            Category::Granulate => &self.granulate_path,
        }
    }

    /// 現在存在する棚卸ファイル
    pub fn existing_files(&self) -> Vec<PathBuf> {
        Category::ALL
            .iter()
            .map(|c| self.path(*c).to_path_buf())
            .filter(|p| p.exists())
            .collect()
    }

    fn should_write(&self, ledger: &Ledger, category: Category) -> bool {
        match category {
            Category::Roll => true,
            // 削除でエントリがなくなった場合も既存ファイルは書き直す
            Category::Granulate => {
                self.granulate_enabled
                    || ledger.has_entries(Category::Granulate)
                    || self.granulate_path.exists()
            }
        }
    }

    /// 台帳全体を書き出す
    pub fn write(&self, ledger: &Ledger) -> Result<()> {
        for category in Category::ALL {
            if !self.should_write(ledger, category) {
                continue;
            }
            let buffer = excel::generate_ledger_buffer(ledger, category)?;
            let path = self.path(category);
            write_atomic(path, &buffer)?;
            debug!(category = %category, "Excel保存: {}", path.display());
        }
        info!("棚卸ファイル保存: {}件", ledger.len());
        Ok(())
    }
}

impl LedgerStore for XlsxLedgerStore {
    type Error = InventurError;

    fn flush(&mut self, ledger: &Ledger) -> Result<()> {
        self.write(ledger)
    }
}
