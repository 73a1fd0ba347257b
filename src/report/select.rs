//! Row filtering, column projection and re-indexing of the report table.

use crate::database::table::Table;
use crate::database::value::Value;
use crate::error::PpaReportError;
use serde::Deserialize;
use serde::Serialize;

/// A constant compared against a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Literal {
    /// Strict equality: values of another type and missing values never match.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Bool(literal), Value::Bool(value)) => literal == value,
            (Literal::Number(literal), Value::Number(value)) => literal == value,
            (Literal::Text(literal), Value::Text(value)) => literal == value,
            _ => false,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_owned())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Number(value)
    }
}

/// `column == equals`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub equals: Literal,
}

impl Predicate {
    pub fn new(column: &str, equals: impl Into<Literal>) -> Self {
        Predicate {
            column: column.to_owned(),
            equals: equals.into(),
        }
    }
}

/// Rows matching every predicate, projected onto `columns`, indexed by `index`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub predicates: Vec<Predicate>,
    pub columns: Vec<String>,
    pub index: Option<String>,
}

impl Default for Selection {
    /// Handbag sub-categories of the market table.
    fn default() -> Self {
        Selection {
            predicates: vec![
                Predicate::new("macro_categorie", "A_HANDBAG"),
                Predicate::new("nom_micro_categorie", "sous_cat_hb"),
            ],
            columns: [
                "micro_categorie",
                "first_purch_to",
                "evol_first_purch_to",
                "share_of_entry_ty",
                "evol_share_of_entry",
                "recr_index_ty",
                "evol_recr_index",
                "repeat_rate_ty",
                "evol_repeat_rate",
                "repeat_to_ty",
                "evol_repeat_to",
            ]
            .iter()
            .map(|column| column.to_string())
            .collect(),
            index: Some("micro_categorie".to_owned()),
        }
    }
}

/// Applies a selection. No matching row gives an empty table with every
/// requested column, not an error.
///
/// # Errors
/// `ColumnNotFound` for a predicate, projected or index column missing from `table`.
pub fn select_rows(table: &Table, selection: &Selection) -> Result<Table, PpaReportError> {
    let conditions = selection.predicates
        .iter()
        .map(|predicate| Ok((table.column(&predicate.column)?, &predicate.equals)))
        .collect::<Result<Vec<_>, PpaReportError>>()?;
    let filtered = table.filter_rows(|row| {
        conditions.iter().all(|(column, literal)| {
            column.values.get(row).map(|value| literal.matches(value)).unwrap_or(false)
        })
    });

    let mut selected = filtered.select(&selection.columns)?;
    if let Some(index) = &selection.index {
        selected.set_index(index)?;
    }

    if selected.is_empty() {
        log::warn!("no row of table '{}' matches {} predicate(s)", table.name, selection.predicates.len());
    } else {
        log::info!("selected {} of {} row(s) from table '{}'", selected.row_count(), table.row_count(), table.name);
    }
    Ok(selected)
}
