use crate::error::PpaReportError;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use thiserror::Error;

/// Errors related to A1-style range parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String)
}

/// An A1-style cell range with optional boundaries.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Range {
    /// Lower row bound (0-based index), None for unbounded
    pub(crate) row_lower_bound: Option<usize>,
    /// Upper row bound (0-based index), None for unbounded
    pub(crate) row_upper_bound: Option<usize>,
    /// Lower column bound (0-based index), None for unbounded
    pub(crate) col_lower_bound: Option<usize>,
    /// Upper column bound (0-based index), None for unbounded
    pub(crate) col_upper_bound: Option<usize>,
}

impl Range {
    /// Range covering the given columns from `first_row` downwards.
    pub(crate) fn from_columns(first_row: usize, col_lower_bound: Option<usize>, col_upper_bound: Option<usize>) -> Self {
        Range {
            row_lower_bound: Some(first_row),
            row_upper_bound: None,
            col_lower_bound,
            col_upper_bound,
        }
    }

    /// Zero-based column indexes covered by a column-bounded range.
    pub(crate) fn columns(&self) -> Option<Vec<usize>> {
        let lower = self.col_lower_bound?;
        let upper = self.col_upper_bound.unwrap_or(lower);
        Some((lower..=upper).collect())
    }
}

impl TryFrom<&str> for Range {
    type Error = PpaReportError;

    /// Parses a range such as `A1`, `B2:C5`, `G:H` or `1:10`.
    /// Single cells, full ranges and partial (columns or rows only) ranges are accepted.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^([A-Z]*)(\d*)(:([A-Z]*)(\d*))?$")
            .map_err(|error| RangeError::FormatError(error.to_string()))?;
        let value = value.trim().to_ascii_uppercase();
        let captures = pattern
            .captures(value.as_str())
            .ok_or(RangeError::FormatError(value.to_owned()))?;
        let has_upper = captures.get(3).is_some();
        let range = Range {
            col_lower_bound: captures
                .get(1)
                .map(|matcher| matcher.as_str())
                .and_then(col_to_index),
            row_lower_bound: captures
                .get(2)
                .map(|matcher| matcher.as_str())
                .and_then(row_to_index),
            col_upper_bound: captures
                .get(4)
                .map(|matcher| matcher.as_str())
                .and_then(col_to_index),
            row_upper_bound: captures
                .get(5)
                .map(|matcher| matcher.as_str())
                .and_then(row_to_index),
        };
        // A single reference like `G` or `B3` bounds itself on both sides
        if has_upper {
            Ok(range)
        } else {
            Ok(Range {
                col_upper_bound: range.col_lower_bound,
                row_upper_bound: range.row_lower_bound,
                ..range
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_ranges() {
        let range = Range::try_from("B2:C5").unwrap();
        assert_eq!(range, Range {
            row_lower_bound: Some(1),
            row_upper_bound: Some(4),
            col_lower_bound: Some(1),
            col_upper_bound: Some(2),
        });
    }

    #[test]
    fn parses_column_ranges() {
        let range = Range::try_from("g:h").unwrap();
        assert_eq!(range.row_lower_bound, None);
        assert_eq!(range.columns(), Some(vec![6, 7]));

        let single = Range::try_from("G").unwrap();
        assert_eq!(single.columns(), Some(vec![6]));
    }

    #[test]
    fn parses_row_ranges() {
        let range = Range::try_from("2:10").unwrap();
        assert_eq!(range.row_lower_bound, Some(1));
        assert_eq!(range.row_upper_bound, Some(9));
        assert_eq!(range.columns(), None);
    }

    #[test]
    fn empty_is_unbounded() {
        assert_eq!(Range::try_from("").unwrap(), Range::default());
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(Range::try_from("A1:B2:C3").is_err());
        assert!(Range::try_from("1A").is_err());
    }
}
