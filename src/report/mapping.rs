//! Category code to display label lookup.

use crate::database::column::Column;
use crate::database::table::Table;
use crate::database::value::Value;
use crate::error::PpaReportError;
use crate::report::reader::read_table;
use crate::report::reader::ColumnSelection;
use crate::report::reader::ReadOptions;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Name given to the category code column.
pub const KEY_COLUMN: &str = "micro_categorie";

/// Name given to the display label column.
pub const LABEL_COLUMN: &str = "chart";

/// Where the mapping lives in its sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// Sheet rows skipped before the first mapping row
    pub header_row: usize,
    /// Zero-based sheet position of the code column
    pub key_position: usize,
    /// Zero-based sheet position of the label column
    pub label_position: usize,
}

impl Default for MappingOptions {
    fn default() -> Self {
        MappingOptions {
            header_row: 1,
            key_position: 6,
            label_position: 7,
        }
    }
}

/// Unique category codes with their labels, in sheet order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryMapping {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl CategoryMapping {
    /// Builds the mapping from a table with [`KEY_COLUMN`] and [`LABEL_COLUMN`].
    ///
    /// Rows missing either value are dropped, then the first row of every code wins.
    pub fn from_table(table: &Table) -> Result<Self, PpaReportError> {
        let table = table
            .select(&[KEY_COLUMN, LABEL_COLUMN])?
            .drop_missing()
            .drop_duplicates(KEY_COLUMN)?;
        let keys = &table.column(KEY_COLUMN)?.values;
        let labels = &table.column(LABEL_COLUMN)?.values;

        let mut mapping = CategoryMapping::default();
        for (key, label) in keys.iter().zip(labels) {
            mapping.positions.insert(key.to_string(), mapping.entries.len());
            mapping.entries.push((key.to_string(), label.to_string()));
        }
        Ok(mapping)
    }

    /// Label of a category code.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .and_then(|position| self.entries.get(*position))
            .map(|(_, label)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as `(code, label)` in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, label)| (key.as_str(), label.as_str()))
    }

    /// Labels for the codes of column `key_column`, named [`LABEL_COLUMN`].
    /// Unknown and missing codes give missing labels.
    pub fn translate(&self, table: &Table, key_column: &str) -> Result<Column, PpaReportError> {
        let values = table
            .column(key_column)?
            .values
            .iter()
            .map(|key| match key {
                Value::Missing => Value::Missing,
                key => Value::from(self.get(&key.to_string())),
            })
            .collect();
        Ok(Column::new(LABEL_COLUMN, values))
    }
}

/// Reads the code/label pairs of a mapping sheet.
pub fn extract_mapping(path: &Path, sheet: &str, options: &MappingOptions) -> Result<CategoryMapping, PpaReportError> {
    let read_options = ReadOptions {
        header_row: options.header_row,
        columns: Some(ColumnSelection::Indices(vec![options.key_position, options.label_position])),
        names: Some(vec![KEY_COLUMN.to_owned(), LABEL_COLUMN.to_owned()]),
        header: false,
        ..ReadOptions::default()
    };
    let mut table = read_table(path, sheet, &read_options)?;
    // Selected columns come back in sheet order
    if options.key_position > options.label_position {
        table.columns.reverse();
        for (column, name) in table.columns.iter_mut().zip([KEY_COLUMN, LABEL_COLUMN]) {
            column.name = name.to_owned();
        }
    }
    let mapping = CategoryMapping::from_table(&table)?;
    log::debug!("extracted {} category label(s) from sheet '{}'", mapping.len(), sheet);
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(keys: Vec<Value>, labels: Vec<Value>) -> Table {
        Table::from_columns("Params", vec![
            Column::new(KEY_COLUMN, keys),
            Column::new(LABEL_COLUMN, labels),
        ])
        .unwrap()
    }

    #[test]
    fn first_label_wins() {
        let mapping = CategoryMapping::from_table(&table(
            vec![Value::from("HB_SMALL"), Value::from("HB_LARGE"), Value::from("HB_SMALL")],
            vec![Value::from("Small bags"), Value::from("Large bags"), Value::from("Mini bags")],
        ))
        .unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("HB_SMALL"), Some("Small bags"));
        assert_eq!(mapping.iter().collect::<Vec<_>>(), vec![
            ("HB_SMALL", "Small bags"),
            ("HB_LARGE", "Large bags"),
        ]);
    }

    #[test]
    fn incomplete_rows_are_excluded() {
        let mapping = CategoryMapping::from_table(&table(
            vec![Value::from("HB_SMALL"), Value::Missing, Value::from("HB_WALLET")],
            vec![Value::Missing, Value::from("Orphan"), Value::from("Wallets")],
        ))
        .unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("HB_SMALL"), None);
        assert_eq!(mapping.get("HB_WALLET"), Some("Wallets"));
    }

    #[test]
    fn missing_row_does_not_shadow_later_label() {
        // The incomplete first row is dropped before deduplication
        let mapping = CategoryMapping::from_table(&table(
            vec![Value::from("HB_SMALL"), Value::from("HB_SMALL")],
            vec![Value::Missing, Value::from("Small bags")],
        ))
        .unwrap();
        assert_eq!(mapping.get("HB_SMALL"), Some("Small bags"));
    }

    #[test]
    fn numeric_codes_use_display_form() {
        let mapping = CategoryMapping::from_table(&table(
            vec![Value::from(12.0)],
            vec![Value::from("Twelve")],
        ))
        .unwrap();
        assert_eq!(mapping.get("12"), Some("Twelve"));
    }

    #[test]
    fn translates_codes() {
        let mapping = CategoryMapping::from_table(&table(
            vec![Value::from("HB_SMALL")],
            vec![Value::from("Small bags")],
        ))
        .unwrap();
        let market = Table::from_columns("market", vec![
            Column::new("micro_categorie", vec![Value::from("HB_SMALL"), Value::from("HB_XL"), Value::Missing]),
        ])
        .unwrap();
        let labels = mapping.translate(&market, "micro_categorie").unwrap();
        assert_eq!(labels.name, LABEL_COLUMN);
        assert_eq!(labels.values, vec![Value::from("Small bags"), Value::Missing, Value::Missing]);
    }
}
