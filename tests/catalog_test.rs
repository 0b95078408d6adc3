//! Arbeitstabelle読み込みの統合テスト

mod common;

use common::{write_catalog, write_sheet, Cell, ROLL_HEADERS};
use inventur_common::{resolve, Category, ReferenceRecord, ScanOutcome};
use inventur_scan::error::InventurError;
use inventur_scan::import::load_catalog;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

#[test]
fn test_load_rolls_and_granulate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Arbeitstabelle.xlsx");
    write_catalog(&path, true);

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.rolls().len(), 2);
    assert_eq!(catalog.granulate().map(|g| g.len()), Some(1));
    assert_eq!(catalog.categories(), vec![Category::Roll, Category::Granulate]);

    let roll = &catalog.rolls()[0];
    assert_eq!(roll.code, "A100");
    assert_eq!(roll.width_mm, 1200);
    assert_eq!(roll.bin.as_deref(), Some("R-01"));
    // 数値セルのMaterialは ".0" なし
    assert_eq!(catalog.rolls()[1].material_id, "4712");
    assert_eq!(catalog.rolls()[1].bin, None);
}

#[test]
fn test_leading_zeros_preserved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Arbeitstabelle.xlsx");
    write_catalog(&path, false);

    let catalog = load_catalog(&path).unwrap();
    assert!(catalog.granulate().is_none());
    assert_eq!(catalog.rolls()[1].code, "007");

    // スキャン "7" は先頭ゼロ付きのChargeには一致しない
    match resolve(&catalog, "7").unwrap() {
        ScanOutcome::NotFound { code } => assert_eq!(code, "7"),
        other => panic!("unexpected: {:?}", other),
    }
    match resolve(&catalog, "007").unwrap() {
        ScanOutcome::Found { record: ReferenceRecord::Roll(r), .. } => assert_eq!(r.code, "007"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_missing_required_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Arbeitstabelle.xlsx");
    let mut workbook = Workbook::new();
    // 「Breite mm」なし
    write_sheet(
        &mut workbook,
        "Rollen",
        &["Charge", "Material", "Materialkurztext", "Länge m", "Frei verwendbar"],
        &[vec![Cell::Text("A1"), Cell::Text("1")]],
    );
    workbook.save(&path).unwrap();

    let err = load_catalog(&path).unwrap_err();
    match err {
        InventurError::CatalogMissingColumns { sheet, columns } => {
            assert_eq!(sheet, "Rollen");
            assert_eq!(columns, "Breite mm");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_first_sheet_used_without_rollen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Arbeitstabelle.xlsx");
    let mut workbook = Workbook::new();
    write_sheet(
        &mut workbook,
        "Tabelle1",
        ROLL_HEADERS,
        &[vec![
            Cell::Text("B200"),
            Cell::Text("4711"),
            Cell::Text("Folie"),
            Cell::Number(10.0),
            Cell::Number(500.0),
            Cell::Number(5.0),
        ]],
    );
    workbook.save(&path).unwrap();

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.rolls()[0].code, "B200");
}

#[test]
fn test_missing_catalog_file() {
    let dir = tempdir().unwrap();
    let err = load_catalog(&dir.path().join("fehlt.xlsx")).unwrap_err();
    assert!(matches!(err, InventurError::FileNotFound(_)));
}
