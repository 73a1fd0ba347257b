//! Workbook sheet to [`Table`] loading.

use crate::database::column::Column;
use crate::database::range::Range;
use crate::database::table::Table;
use crate::database::value::Value;
use crate::error::PpaReportError;
use crate::report::ReportError;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::open_spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;

/// Columns to keep, by zero-based sheet position or as an A1 column range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelection {
    /// Zero-based positions, `0` being sheet column `A`
    Indices(Vec<usize>),
    /// Column range such as `"G:H"`
    Range(String),
}

impl ColumnSelection {
    /// Sorted, deduplicated sheet positions.
    pub fn positions(&self) -> Result<Vec<usize>, PpaReportError> {
        let mut positions = match self {
            ColumnSelection::Indices(indices) => indices.to_owned(),
            ColumnSelection::Range(range) => Range::try_from(range.as_str())?
                .columns()
                .ok_or_else(|| ReportError::InvalidParameter {
                    name: "columns".to_owned(),
                    message: format!("range '{range}' selects no column"),
                })?,
        };
        if positions.is_empty() {
            Err(ReportError::InvalidParameter {
                name: "columns".to_owned(),
                message: "empty column selection".to_owned(),
            })?
        }
        positions.sort_unstable();
        positions.dedup();
        Ok(positions)
    }
}

/// How a sheet is turned into a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Sheet rows skipped before the header (or the data, without header)
    pub header_row: usize,
    /// Columns to keep, all columns when absent
    pub columns: Option<ColumnSelection>,
    /// Names replacing the header names, positionally
    pub names: Option<Vec<String>>,
    /// Whether the first row read holds the column names
    pub header: bool,
    /// Text values read as missing, in addition to empty text
    pub placeholders: Vec<String>,
    /// Error cells (`#N/A`, `#DIV/0!`) read as missing instead of text
    pub error_as_null: bool,
    /// Leave rows without any cell out of the table
    pub skip_empty_rows: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            header_row: 0,
            columns: None,
            names: None,
            header: true,
            placeholders: Vec::new(),
            error_as_null: false,
            skip_empty_rows: true,
        }
    }
}

/// Reads one sheet of a workbook into a table named after the sheet.
///
/// # Errors
/// * `SourceNotFound` when `path` does not exist, before anything is opened.
/// * `SheetNotFound` when the workbook has no sheet named `sheet`.
/// * `InvalidParameter` when explicit names do not match the column count.
pub fn read_table(path: &Path, sheet: &str, options: &ReadOptions) -> Result<Table, PpaReportError> {
    let selection = options.columns
        .as_ref()
        .map(ColumnSelection::positions)
        .transpose()?;
    let criteria = Criteria {
        sheet_name: sheet.to_owned(),
        range: Range::from_columns(
            options.header_row,
            selection.as_ref().and_then(|positions| positions.first().copied()),
            selection.as_ref().and_then(|positions| positions.last().copied()),
        ),
        error_as_null: options.error_as_null,
        skip_empty_rows: options.skip_empty_rows,
    };

    // The workbook is closed when `spreadsheet` goes out of scope
    let mut spreadsheet = open_spreadsheet(path)?;
    let shared_strings = spreadsheet.load_shared_strings()?;
    log::debug!("'{}' has sheets {:?}", spreadsheet.name(), spreadsheet.sheet_names());
    let sheet_data = spreadsheet.read_sheet(&criteria)?;
    if sheet_data.is_empty() {
        log::warn!("sheet '{}' of '{}' has no data", sheet, path.display());
    }

    let nulls: HashSet<&str> = options.placeholders
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(""))
        .collect();
    let grid = sheet_data.rows();
    let col_lower = sheet_data.col_bounds().map(|(lower, _)| lower).unwrap_or(0);
    let positions = selection.unwrap_or_else(|| match sheet_data.col_bounds() {
        Some((lower, upper)) => (lower..=upper).collect(),
        None => Vec::new(),
    });

    let mut rows = Vec::<Vec<Value>>::with_capacity(grid.len());
    for record in &grid {
        let cells: Vec<_> = positions
            .iter()
            .map(|position| position.checked_sub(col_lower).and_then(|offset| record.get(offset).copied().flatten()))
            .collect();
        if options.skip_empty_rows && cells.iter().all(Option::is_none) {
            continue;
        }
        let mut values = Vec::with_capacity(cells.len());
        for cell in cells {
            let value = match cell {
                Some(cell) => cell.to_value(&shared_strings).map_err(|message| {
                    SpreadsheetError::CellValueError(
                        sheet_data.file_name.to_owned(),
                        sheet_data.name.to_owned(),
                        cell.reference(),
                        message,
                    )
                })?,
                None => Value::Missing,
            };
            values.push(value);
        }
        rows.push(values);
    }

    let header = if options.header && !rows.is_empty() {
        Some(rows.remove(0))
    } else {
        None
    };
    // An empty sheet without column selection still takes its explicit names
    let count = match &options.names {
        Some(names) if positions.is_empty() => names.len(),
        _ => positions.len(),
    };
    let names = column_names(header.as_deref(), options.names.as_deref(), count)?;

    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
        .collect();
    // Placeholders only apply below the header
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row) {
            column.values.push(to_null(value, &nulls));
        }
    }

    let table = Table::from_columns(sheet, columns)?;
    log::debug!(
        "read {} row(s) x {} column(s) from '{}' sheet '{}'",
        table.row_count(),
        table.columns.len(),
        path.display(),
        sheet
    );
    Ok(table)
}

fn to_null(value: Value, nulls: &HashSet<&str>) -> Value {
    match value {
        Value::Text(text) if nulls.contains(text.as_str()) => Value::Missing,
        value => value,
    }
}

/// Resolves the column names from explicit names, the header row or generated defaults.
fn column_names(header: Option<&[Value]>, names: Option<&[String]>, count: usize) -> Result<Vec<String>, PpaReportError> {
    if let Some(names) = names {
        if names.len() != count {
            Err(ReportError::InvalidParameter {
                name: "names".to_owned(),
                message: format!("{} name(s) given for {} column(s)", names.len(), count),
            })?
        }
        return Ok(names.to_vec());
    }

    let Some(header) = header else {
        return Ok((1..=count).map(|number| format!("column{number}")).collect());
    };

    let mut seen = HashMap::<String, usize>::new();
    let names = (0..count)
        .map(|position| {
            let name = match header.get(position).map(Value::to_string) {
                Some(name) if !name.is_empty() => name,
                _ => format!("Unnamed: {position}"),
            };
            let occurrences = seen.entry(name.to_owned()).or_insert(0);
            *occurrences += 1;
            if *occurrences == 1 {
                name
            } else {
                format!("{}.{}", name, *occurrences - 1)
            }
        })
        .collect();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_names_fill_blanks_and_suffix_duplicates() {
        let header = vec![Value::from("evol"), Value::Missing, Value::from("evol"), Value::from(2024.0)];
        let names = column_names(Some(header.as_slice()), None, 5).unwrap();
        assert_eq!(names, vec!["evol", "Unnamed: 1", "evol.1", "2024", "Unnamed: 4"]);
    }

    #[test]
    fn explicit_names_win() {
        let names = vec!["micro_categorie".to_owned(), "chart".to_owned()];
        assert_eq!(column_names(None, Some(names.as_slice()), 2).unwrap(), names);
        assert!(matches!(
            column_names(None, Some(names.as_slice()), 3),
            Err(PpaReportError::ReportError(ReportError::InvalidParameter { .. }))
        ));
    }

    #[test]
    fn generated_names_without_header() {
        assert_eq!(column_names(None, None, 2).unwrap(), vec!["column1", "column2"]);
    }

    #[test]
    fn placeholders_become_missing() {
        let nulls = HashSet::from([",", ""]);
        assert_eq!(to_null(Value::from(","), &nulls), Value::Missing);
        assert_eq!(to_null(Value::from(""), &nulls), Value::Missing);
        assert_eq!(to_null(Value::from(",,"), &nulls), Value::from(",,"));
        assert_eq!(to_null(Value::from(0.0), &nulls), Value::from(0.0));
    }

    #[test]
    fn column_selection_positions() {
        assert_eq!(ColumnSelection::Indices(vec![7, 6, 7]).positions().unwrap(), vec![6, 7]);
        assert_eq!(ColumnSelection::Range("G:H".to_owned()).positions().unwrap(), vec![6, 7]);
        assert!(ColumnSelection::Range("2:3".to_owned()).positions().is_err());
        assert!(ColumnSelection::Indices(Vec::new()).positions().is_err());
    }

    #[test]
    fn column_selection_from_json() {
        let indices: ColumnSelection = serde_json::from_str("[6, 7]").unwrap();
        assert_eq!(indices, ColumnSelection::Indices(vec![6, 7]));
        let range: ColumnSelection = serde_json::from_str("\"G:H\"").unwrap();
        assert_eq!(range, ColumnSelection::Range("G:H".to_owned()));
    }

    #[test]
    fn missing_source_is_reported_first() {
        let result = read_table(Path::new("no/such/region.xlsx"), "Params", &ReadOptions::default());
        let error = result.err().unwrap();
        assert!(matches!(error.as_spreadsheet_error(), Some(SpreadsheetError::SourceNotFound(_))));
    }
}
