use crate::database::column::Column;
use crate::database::value::Value;
use crate::error::PpaReportError;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised by table operations.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Column '{column}' has {actual} value(s), table has {expected} row(s)")]
    LengthMismatch { column: String, expected: usize, actual: usize },
}

/// Ordered named columns of equal length, rows kept in insertion order.
///
/// An optional index column labels the rows. It is moved out of the data
/// columns by [`Table::set_index`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Table name, usually the sheet it was read from
    pub name: String,
    pub columns: Vec<Column>,
    pub index: Option<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            columns: Vec::new(),
            index: None,
        }
    }

    /// Builds a table, checking that every column has the same length.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, PpaReportError> {
        let mut table = Table::new(name);
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .or(self.index.as_ref())
            .map(Column::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Looks a column up by name. The index column is found too.
    pub fn column(&self, name: &str) -> Result<&Column, PpaReportError> {
        self.columns
            .iter()
            .chain(self.index.iter())
            .find(|column| column.name == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_owned(), self.name.to_owned()).into())
    }

    /// Value at `row` of column `name`.
    pub fn value(&self, row: usize, name: &str) -> Result<&Value, PpaReportError> {
        let column = self.column(name)?;
        Ok(column.values.get(row).unwrap_or(&Value::Missing))
    }

    /// Appends a column, or replaces the column with the same name in place.
    pub fn push_column(&mut self, column: Column) -> Result<(), PpaReportError> {
        if !self.columns.is_empty() || self.index.is_some() {
            let expected = self.row_count();
            if column.len() != expected {
                Err(TableError::LengthMismatch {
                    column: column.name.to_owned(),
                    expected,
                    actual: column.len(),
                })?
            }
        }
        match self.columns.iter_mut().find(|existing| existing.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Keeps the rows at `rows`, in that order.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let take = |column: &Column| Column {
            name: column.name.to_owned(),
            values: rows
                .iter()
                .map(|row| column.values.get(*row).cloned().unwrap_or_default())
                .collect(),
        };
        Table {
            name: self.name.to_owned(),
            columns: self.columns.iter().map(take).collect(),
            index: self.index.as_ref().map(take),
        }
    }

    /// Keeps the rows for which `predicate` holds.
    pub fn filter_rows<P>(&self, predicate: P) -> Table
    where
        P: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.row_count()).filter(|row| predicate(*row)).collect();
        self.take_rows(&rows)
    }

    /// Projects the table onto `names`, in that order. The index is kept.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, PpaReportError> {
        let columns = names
            .iter()
            .map(|name| self.column(name.as_ref()).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table {
            name: self.name.to_owned(),
            columns,
            index: self.index.clone(),
        })
    }

    /// Moves column `name` out of the data columns to become the row index.
    pub fn set_index(&mut self, name: &str) -> Result<(), PpaReportError> {
        let position = self.columns
            .iter()
            .position(|column| column.name == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_owned(), self.name.to_owned()))?;
        self.index = Some(self.columns.remove(position));
        Ok(())
    }

    /// Drops every row holding a missing value in any data column.
    pub fn drop_missing(&self) -> Table {
        self.filter_rows(|row| {
            self.columns
                .iter()
                .all(|column| column.values.get(row).map(|value| !value.is_missing()).unwrap_or(false))
        })
    }

    /// Drops rows whose value in column `key` was already seen, keeping the first.
    pub fn drop_duplicates(&self, key: &str) -> Result<Table, PpaReportError> {
        let column = self.column(key)?;
        let mut seen = HashSet::<String>::new();
        let rows: Vec<usize> = column
            .values
            .iter()
            .enumerate()
            .filter(|(_, value)| seen.insert(value.to_string()))
            .map(|(row, _)| row)
            .collect();
        Ok(self.take_rows(&rows))
    }
}
