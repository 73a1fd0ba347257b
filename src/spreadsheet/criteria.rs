use crate::database::range::Range;

/// Criteria for selecting the cells of one sheet.
#[derive(Clone, Debug)]
pub(crate) struct Criteria {
    /// Exact name of the sheet to read.
    pub(crate) sheet_name: String,

    /// Data range within the sheet to extract.
    pub(crate) range: Range,

    /// Read error cells (`#N/A`, `#DIV/0!`, ...) as missing values instead of text.
    pub(crate) error_as_null: bool,

    /// Skip rows where all columns are empty.
    pub(crate) skip_empty_rows: bool,
}

impl Criteria {
    /// Checks whether a workbook sheet is the requested one.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        self.sheet_name == sheet_name
    }
}
