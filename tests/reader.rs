mod common;

use common::{e, n, t, Cell, WorkbookBuilder};
use ppa_report::report::reader::ColumnSelection;
use ppa_report::{read_table, PpaReportError, ReadOptions, SpreadsheetError, Value};
use pretty_assertions::assert_eq;
use std::path::Path;

fn options() -> ReadOptions {
    ReadOptions {
        header_row: 1,
        placeholders: vec![",".to_owned()],
        ..ReadOptions::default()
    }
}

fn workbook(directory: &Path) -> std::path::PathBuf {
    WorkbookBuilder::new()
        .sheet("Data", vec![
            vec![t("Title row")],
            vec![t("code"), t("value"), e(), t("value"), t(",")],
            vec![t("HB_SMALL"), n(1.5), t("x"), n(2.0), t("a")],
            vec![],
            vec![t("HB_LARGE"), t(","), e(), n(3.0), Cell::Error("#DIV/0!".to_owned())],
        ])
        .write(directory, "data.xlsx")
}

#[test]
fn header_offset_names_and_placeholders() {
    let directory = tempfile::tempdir().unwrap();
    let table = read_table(&workbook(directory.path()), "Data", &options()).unwrap();

    assert_eq!(table.name, "Data");
    // Placeholders only apply to data cells, the header keeps ","
    assert_eq!(table.column_names(), vec!["code", "value", "Unnamed: 2", "value.1", ","]);
    // The blank sheet row is skipped
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, "value").unwrap(), &Value::from(1.5));
    assert_eq!(table.value(1, "value").unwrap(), &Value::Missing);
    assert_eq!(table.value(1, "Unnamed: 2").unwrap(), &Value::Missing);
    assert_eq!(table.value(1, ",").unwrap(), &Value::from("#DIV/0!"));
}

#[test]
fn placeholders_are_configurable() {
    let directory = tempfile::tempdir().unwrap();
    let options = ReadOptions {
        placeholders: Vec::new(),
        ..options()
    };
    let table = read_table(&workbook(directory.path()), "Data", &options).unwrap();
    assert_eq!(table.column_names()[4], ",");
    assert_eq!(table.value(1, "value").unwrap(), &Value::from(","));
}

#[test]
fn error_cells_as_missing() {
    let directory = tempfile::tempdir().unwrap();
    let options = ReadOptions {
        error_as_null: true,
        ..options()
    };
    let table = read_table(&workbook(directory.path()), "Data", &options).unwrap();
    assert_eq!(table.value(1, ",").unwrap(), &Value::Missing);
}

#[test]
fn column_selection_and_names() {
    let directory = tempfile::tempdir().unwrap();
    let path = workbook(directory.path());

    let by_index = ReadOptions {
        columns: Some(ColumnSelection::Indices(vec![3, 0])),
        ..options()
    };
    let table = read_table(&path, "Data", &by_index).unwrap();
    assert_eq!(table.column_names(), vec!["code", "value"]);
    assert_eq!(table.column("value").unwrap().values, vec![Value::from(2.0), Value::from(3.0)]);

    let by_range = ReadOptions {
        columns: Some(ColumnSelection::Range("A:B".to_owned())),
        names: Some(vec!["micro_categorie".to_owned(), "amount".to_owned()]),
        ..options()
    };
    let table = read_table(&path, "Data", &by_range).unwrap();
    assert_eq!(table.column_names(), vec!["micro_categorie", "amount"]);
    assert_eq!(table.value(0, "micro_categorie").unwrap(), &Value::from("HB_SMALL"));
}

#[test]
fn without_header_every_row_is_data() {
    let directory = tempfile::tempdir().unwrap();
    let options = ReadOptions {
        header_row: 2,
        header: false,
        columns: Some(ColumnSelection::Indices(vec![0, 1])),
        ..options()
    };
    let table = read_table(&workbook(directory.path()), "Data", &options).unwrap();
    assert_eq!(table.column_names(), vec!["column1", "column2"]);
    assert_eq!(table.column("column1").unwrap().values, vec![Value::from("HB_SMALL"), Value::from("HB_LARGE")]);
}

#[test]
fn blank_rows_can_be_kept() {
    let directory = tempfile::tempdir().unwrap();
    let options = ReadOptions {
        skip_empty_rows: false,
        ..options()
    };
    let table = read_table(&workbook(directory.path()), "Data", &options).unwrap();
    assert_eq!(table.row_count(), 3);
    assert!(table.columns.iter().all(|column| column.values[1].is_missing()));
}

#[test]
fn name_count_mismatch_is_invalid() {
    let directory = tempfile::tempdir().unwrap();
    let options = ReadOptions {
        columns: Some(ColumnSelection::Indices(vec![0, 1])),
        names: Some(vec!["only_one".to_owned()]),
        ..options()
    };
    let error = read_table(&workbook(directory.path()), "Data", &options).err().unwrap();
    assert!(matches!(
        error,
        PpaReportError::ReportError(ppa_report::report::ReportError::InvalidParameter { .. })
    ));
}

#[test]
fn unknown_sheet_is_sheet_not_found() {
    let directory = tempfile::tempdir().unwrap();
    let error = read_table(&workbook(directory.path()), "SAS 12.1", &options()).err().unwrap();
    assert!(matches!(
        error.as_spreadsheet_error(),
        Some(SpreadsheetError::SheetNotFound(_, sheet)) if sheet == "SAS 12.1"
    ));
}

#[test]
fn missing_file_is_source_not_found() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("absent.xlsx");
    let error = read_table(&path, "Data", &options()).err().unwrap();
    assert!(matches!(error.as_spreadsheet_error(), Some(SpreadsheetError::SourceNotFound(_))));
}
