use crate::error::{InventurError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "INVENTUR_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 記録・削除のたびに即時保存
    pub auto_save: bool,
    pub data_dir: PathBuf,
    pub catalog_file: String,
    pub roll_ledger_file: String,
    pub granulate_ledger_file: String,
    pub backup_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 設定ファイルを読み込む（環境変数は反映しない）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default_config());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 実行時の設定（環境変数を優先）。保存には使わない
    pub fn with_env_overrides(self) -> Self {
        self.with_data_dir_override(std::env::var(DATA_DIR_ENV).ok())
    }

    pub fn with_data_dir_override(mut self, data_dir: Option<String>) -> Self {
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InventurError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("inventur-scan"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            auto_save: true,
            data_dir: PathBuf::from("data"),
            catalog_file: "Arbeitstabelle.xlsx".into(),
            roll_ledger_file: "Inventur.xlsx".into(),
            granulate_ledger_file: "Inventur_Granulat.xlsx".into(),
            backup_dir: PathBuf::from("backups"),
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    pub fn roll_ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.roll_ledger_file)
    }

    pub fn granulate_ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.granulate_ledger_file)
    }

    /// バックアップ先（相対パスはデータフォルダ基準）
    pub fn backup_path(&self) -> PathBuf {
        if self.backup_dir.is_absolute() {
            self.backup_dir.clone()
        } else {
            self.data_dir.join(&self.backup_dir)
        }
    }

    pub fn set_auto_save(&mut self, auto_save: bool) -> Result<()> {
        self.auto_save = auto_save;
        self.save()
    }
}
