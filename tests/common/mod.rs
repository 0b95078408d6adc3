//! テスト用Arbeitstabelleの生成

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::Path;

pub const ROLL_HEADERS: &[&str] = &[
    "Charge",
    "Material",
    "Materialkurztext",
    "Länge m",
    "Breite mm",
    "Frei verwendbar",
    "Lagerplatz",
];

pub const GRANULATE_HEADERS: &[&str] = &["Charge", "Material", "Materialkurztext", "Frei verwendbar"];

pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

pub fn write_sheet(workbook: &mut Workbook, name: &str, headers: &[&str], rows: &[Vec<Cell>]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).unwrap();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32 + 1, c as u16);
            match cell {
                Cell::Text(s) => sheet.write_string(r, c, *s).unwrap(),
                Cell::Number(n) => sheet.write_number(r, c, *n).unwrap(),
            };
        }
    }
}

/// ロール2件・グラニュレート1件のArbeitstabelle
pub fn write_catalog(path: &Path, with_granulate: bool) {
    use Cell::*;
    let mut workbook = Workbook::new();
    write_sheet(
        &mut workbook,
        "Rollen",
        ROLL_HEADERS,
        &[
            vec![
                Text("A100"),
                Text("4711"),
                Text("Folie transparent"),
                Number(25.0),
                Number(1200.0),
                Number(30.0),
                Text("R-01"),
            ],
            vec![
                Text("007"),
                Number(4712.0),
                Text("Folie blau"),
                Number(50.0),
                Number(800.0),
                Number(40.0),
            ],
        ],
    );
    if with_granulate {
        write_sheet(
            &mut workbook,
            "Granulat",
            GRANULATE_HEADERS,
            &[vec![Text("G-1"), Text("9001"), Text("PE Granulat"), Number(250.5)]],
        );
    }
    workbook.save(path).unwrap();
}
