//! Builds small `.xlsx` workbooks for the integration tests.
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A cell written to a test sheet.
#[derive(Clone, Debug)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Error(String),
}

pub fn n(value: f64) -> Cell {
    Cell::Number(value)
}

pub fn t(value: &str) -> Cell {
    Cell::Text(value.to_owned())
}

pub fn e() -> Cell {
    Cell::Empty
}

/// Sheets in workbook order, each a grid of rows starting at `A1`.
#[derive(Default)]
pub struct WorkbookBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        WorkbookBuilder::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_owned(), rows));
        self
    }

    pub fn write(&self, directory: &Path, file_name: &str) -> PathBuf {
        let path = directory.join(file_name);
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();

        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#).unwrap();

        let mut workbook = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#);
        let mut relationships = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        for (index, (name, _)) in self.sheets.iter().enumerate() {
            let number = index + 1;
            workbook.push_str(&format!(r#"<sheet name="{}" sheetId="{number}" r:id="rId{number}"/>"#, escape(name)));
            relationships.push_str(&format!(
                r#"<Relationship Id="rId{number}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{number}.xml"/>"#
            ));
        }
        workbook.push_str("</sheets></workbook>");
        relationships.push_str("</Relationships>");

        writer.start_file("xl/workbook.xml", options).unwrap();
        writer.write_all(workbook.as_bytes()).unwrap();
        writer.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        writer.write_all(relationships.as_bytes()).unwrap();

        for (index, (_, rows)) in self.sheets.iter().enumerate() {
            writer.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options).unwrap();
            writer.write_all(worksheet(rows).as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }
}

fn worksheet(rows: &[Vec<Cell>]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#);
    for (row, cells) in rows.iter().enumerate() {
        if cells.iter().all(|cell| matches!(cell, Cell::Empty)) {
            continue;
        }
        xml.push_str(&format!(r#"<row r="{}">"#, row + 1));
        for (col, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letters(col), row + 1);
            match cell {
                Cell::Empty => (),
                Cell::Number(value) => xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#)),
                Cell::Text(value) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(value)
                )),
                Cell::Error(value) => xml.push_str(&format!(r#"<c r="{reference}" t="e"><v>{}</v></c>"#, escape(value))),
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn column_letters(col: usize) -> String {
    let mut col = col + 1;
    let mut letters = Vec::new();
    while col > 0 {
        col -= 1;
        letters.push(b'A' + (col % 26) as u8);
        col /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Recruitment sheet columns read by the report, in sheet order.
pub const RECRUITMENT_HEADER: [&str; 18] = [
    "macro_categorie",
    "nom_micro_categorie",
    "micro_categorie",
    "ca_prem_ach_only_ty",
    "ca_prem_ach_xsell_ty",
    "ca_prem_ach_ty",
    "evol_ca_prem_ach_only",
    "evol_ca_prem_ach_xsell",
    "evol_ca_prem_ach",
    "share_of_entry_ty",
    "evol_share_of_entry",
    "recr_index_ty",
    "evol_recr_index",
    "repeat_rate_ty",
    "evol_repeat_rate",
    "repeat_to_ty",
    "evol_repeat_to",
    "comment",
];

/// One recruitment row: categories, then turnovers, evolutions and indicators.
pub fn recruitment_row(macro_categorie: &str, nom_micro_categorie: &str, micro_categorie: &str, base: f64) -> Vec<Cell> {
    vec![
        t(macro_categorie),
        t(nom_micro_categorie),
        t(micro_categorie),
        n(base),
        n(base * 2.0),
        n(base * 3.0),
        n(-0.10),
        n(0.10),
        n(0.0),
        n(0.25),
        n(3.0),
        n(1.1),
        n(0.12),
        n(0.4),
        n(-2.0),
        n(850.0),
        n(-0.02),
        t(","),
    ]
}

/// A market workbook with a title row above the recruitment header and a
/// label mapping in columns `G:H` of `Params`, below one title row.
pub fn market_workbook(directory: &Path, sheet: &str) -> PathBuf {
    let mut recruitment = vec![
        vec![t("China - recruitment")],
        RECRUITMENT_HEADER.iter().map(|name| t(name)).collect(),
    ];
    recruitment.push(recruitment_row("A_HANDBAG", "sous_cat_hb", "HB_SMALL", 1000.0));
    recruitment.push(recruitment_row("A_HANDBAG", "total", "HB_ALL", 9000.0));
    recruitment.push(recruitment_row("B_SHOES", "sous_cat_hb", "SH_FLAT", 400.0));
    recruitment.push(recruitment_row("A_HANDBAG", "sous_cat_hb", "HB_LARGE", 2500.0));

    let mut params = vec![vec![t("Parameters")]];
    for (key, label) in [
        (t("HB_SMALL"), t("Small bags")),
        (t("HB_LARGE"), t("Large bags")),
        (t("HB_SMALL"), t("Duplicate")),
        (t("HB_MINI"), e()),
        (e(), t("Orphan")),
    ] {
        let mut row = vec![e(); 6];
        row.push(key);
        row.push(label);
        params.push(row);
    }

    WorkbookBuilder::new()
        .sheet(sheet, recruitment)
        .sheet("Params", params)
        .write(directory, "market.xlsx")
}
