//! Office Open XML workbook parsing.
//!
//! Opens `.xlsx`, `.xlsm` and `.xlam` files and extracts the cells of one
//! named sheet, already positioned and typed, for the table layer.

pub(crate) mod cell;
pub(crate) mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::PpaReportError;
use crate::helpers::reader::ensure_source_exists;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::path::Path;
use thiserror::Error;

/// Errors raised while locating and parsing a workbook.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Source '{0}' does not exist")]
    SourceNotFound(String),

    #[error("Sheet '{1}' not found in '{0}'")]
    SheetNotFound(String, String),

    #[error("Unsupported spreadsheet format '{0}'")]
    UnsupportedFormat(String),

    #[error("Spreadsheet '{0}' is password protected")]
    PasswordProtected(String),

    #[error("Spreadsheet '{0}' has no worksheets")]
    EmptySpreadsheet(String),

    #[error("Missing workbook part '{0}'")]
    FileError(String),

    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// A workbook opened for reading.
pub(crate) trait Spreadsheet {
    /// File name of the workbook.
    fn name(&self) -> String;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Loads the shared string table.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, PpaReportError>;

    /// Reads the cells of the sheet accepted by `criteria`.
    ///
    /// # Errors
    /// `SheetNotFound` when no sheet carries the requested name.
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, PpaReportError>;
}

/// Opens a workbook, choosing the parser from the file extension.
///
/// Existence is checked first so that a wrong path is reported as
/// `SourceNotFound` whatever its extension.
pub(crate) fn open_spreadsheet(path: &Path) -> Result<Box<dyn Spreadsheet>, PpaReportError> {
    ensure_source_exists(path)?;
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xlam" => Ok(Box::new(XlsxSpreadsheet::open(path)?)),
        _ => Err(SpreadsheetError::UnsupportedFormat(path.display().to_string()).into()),
    }
}
