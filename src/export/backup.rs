//! 棚卸ファイルのバックアップ
//!
//! 現在の棚卸ファイルをタイムスタンプ付きのファイル名でコピーする。台帳自体は変更しない。

use crate::error::{InventurError, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::info;

/// バックアップ先
#[derive(Debug, Clone, PartialEq)]
pub enum BackupTarget {
    /// フォルダ（ファイル名は自動生成）
    Directory(PathBuf),
    /// ファイル名を指定（対象が1ファイルの場合のみ）
    File(PathBuf),
}

impl BackupTarget {
    /// `--output` の指定から判定（拡張子 .xlsx ならファイル）
    pub fn from_output(output: Option<PathBuf>, default_dir: &Path) -> Self {
        match output {
            Some(path) if is_xlsx(&path) => BackupTarget::File(path),
            Some(dir) => BackupTarget::Directory(dir),
            None => BackupTarget::Directory(default_dir.to_path_buf()),
        }
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

/// `Inventur.xlsx` → `Inventur_Backup_20241120_081530.xlsx`
pub fn backup_file_name(source: &Path, stamp: &NaiveDateTime) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Inventur");
    format!("{}_Backup_{}.xlsx", stem, stamp.format("%Y%m%d_%H%M%S"))
}

/// バックアップを作成し、作成したファイルのパスを返す
pub fn export_backup(
    sources: &[PathBuf],
    target: &BackupTarget,
    stamp: &NaiveDateTime,
) -> Result<Vec<PathBuf>> {
    let sources: Vec<&PathBuf> = sources.iter().filter(|p| p.exists()).collect();
    if sources.is_empty() {
        return Err(InventurError::Backup(
            "バックアップ対象の棚卸ファイルがありません".into(),
        ));
    }

    let destinations: Vec<PathBuf> = match target {
        BackupTarget::File(path) => {
            if sources.len() > 1 {
                return Err(InventurError::Backup(
                    "棚卸ファイルが複数あるため、出力先にはフォルダを指定してください".into(),
                ));
            }
            vec![path.clone()]
        }
        BackupTarget::Directory(dir) => sources
            .iter()
            .map(|source| dir.join(backup_file_name(source, stamp)))
            .collect(),
    };

    for (source, destination) in sources.iter().zip(&destinations) {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::copy(source, destination).map_err(|e| {
            InventurError::Backup(format!("{} → {}: {}", source.display(), destination.display(), e))
        })?;
        info!("バックアップ作成: {}", destination.display());
    }

    Ok(destinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 20)
            .unwrap()
            .and_hms_opt(8, 15, 30)
            .unwrap()
    }

    #[test]
    fn test_backup_file_name() {
        assert_eq!(
            backup_file_name(Path::new("data/Inventur.xlsx"), &stamp()),
            "Inventur_Backup_20241120_081530.xlsx"
        );
    }

    #[test]
    fn test_target_from_output() {
        let default_dir = Path::new("backups");
        assert_eq!(
            BackupTarget::from_output(None, default_dir),
            BackupTarget::Directory(PathBuf::from("backups"))
        );
        assert_eq!(
            BackupTarget::from_output(Some(PathBuf::from("x/Sicherung.XLSX")), default_dir),
            BackupTarget::File(PathBuf::from("x/Sicherung.XLSX"))
        );
    }

    #[test]
    fn test_backup_copies_existing_files_only() {
        let dir = tempdir().expect("Failed to create temp dir");
        let rolls = dir.path().join("Inventur.xlsx");
        let granulate = dir.path().join("Inventur_Granulat.xlsx");
        std::fs::write(&rolls, b"rolls").unwrap();

        let target = BackupTarget::Directory(dir.path().join("backups"));
        let created = export_backup(&[rolls.clone(), granulate], &target, &stamp()).unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(std::fs::read(&created[0]).unwrap(), b"rolls");
        assert!(rolls.exists());
    }

    #[test]
    fn test_backup_without_files_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        let target = BackupTarget::Directory(dir.path().to_path_buf());
        let result = export_backup(&[dir.path().join("missing.xlsx")], &target, &stamp());
        assert!(matches!(result, Err(InventurError::Backup(_))));
    }

    #[test]
    fn test_single_file_target_rejects_multiple_sources() {
        let dir = tempdir().expect("Failed to create temp dir");
        let a = dir.path().join("a.xlsx");
        let b = dir.path().join("b.xlsx");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();

        let target = BackupTarget::File(dir.path().join("out.xlsx"));
        assert!(export_backup(&[a, b], &target, &stamp()).is_err());
    }
}
