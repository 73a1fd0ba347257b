//! Row-wise derived display columns.
//!
//! Each rule formats the numeric cells of its source columns into markup
//! tokens and joins them into one multi-line cell per row.

use crate::database::column::Column;
use crate::database::table::Table;
use crate::database::value::Value;
use crate::error::PpaReportError;
use crate::report::format::kdollar;
use crate::report::format::pct;
use crate::report::markup::wrap;
use crate::report::markup::TextProps;
use serde::Deserialize;
use serde::Serialize;

/// Evolutions beyond this magnitude are colored as a loss or a gain.
const EVOLUTION_THRESHOLD: f64 = 0.05;

/// How the source cells of a derived column are rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// `<$1.0k::{}>` per value
    Currency,
    /// `<+10%::{"color": "darkgreen"}>` per value
    SignedEvolution,
}

/// A column appended to a table, computed from `sources`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedColumnRule {
    pub name: String,
    pub sources: Vec<String>,
    pub kind: Aggregation,
}

impl DerivedColumnRule {
    pub fn new(name: &str, sources: &[&str], kind: Aggregation) -> Self {
        DerivedColumnRule {
            name: name.to_owned(),
            sources: sources.iter().map(|source| source.to_string()).collect(),
            kind,
        }
    }
}

/// The entry turnover columns of the market table.
pub fn default_derived_columns() -> Vec<DerivedColumnRule> {
    vec![
        DerivedColumnRule::new(
            "first_purch_to",
            &["ca_prem_ach_only_ty", "ca_prem_ach_xsell_ty", "ca_prem_ach_ty"],
            Aggregation::Currency,
        ),
        DerivedColumnRule::new(
            "evol_first_purch_to",
            &["evol_ca_prem_ach_only", "evol_ca_prem_ach_xsell", "evol_ca_prem_ach"],
            Aggregation::SignedEvolution,
        ),
    ]
}

/// Color of an evolution: `darkred` below -5%, `darkgreen` above +5%, `dimgray` otherwise.
pub fn pick_colour(evolution: f64) -> &'static str {
    if evolution < -EVOLUTION_THRESHOLD {
        "darkred"
    } else if evolution > EVOLUTION_THRESHOLD {
        "darkgreen"
    } else {
        "dimgray"
    }
}

pub fn currency_token(number: f64) -> String {
    wrap(&kdollar(number), &TextProps::default())
}

pub fn evolution_token(number: f64) -> String {
    wrap(&pct(number), &TextProps::color(pick_colour(number)))
}

/// Applies `formatter` to a number and ends the output with a line break.
/// Non-numeric values are returned unchanged.
pub fn format_numeric<F>(value: &Value, formatter: F) -> Value
where
    F: Fn(f64) -> String,
{
    match value.as_number() {
        Some(number) => Value::Text(format!("{}\n", formatter(number))),
        None => value.clone(),
    }
}

/// Maps every cell of `sources` through [`format_numeric`] and joins the cells
/// of each row in column order, one line per cell, trailing whitespace trimmed.
///
/// A row with any missing cell is missing.
pub fn combine_columns_to_multiline<S, F>(table: &Table, sources: &[S], formatter: F) -> Result<Vec<Value>, PpaReportError>
where
    S: AsRef<str>,
    F: Fn(f64) -> String,
{
    let columns = sources
        .iter()
        .map(|source| table.column(source.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let values = (0..table.row_count())
        .map(|row| {
            let mut combined = String::new();
            for column in &columns {
                let cell = column.values.get(row).unwrap_or(&Value::Missing);
                match format_numeric(cell, &formatter) {
                    Value::Missing => return Value::Missing,
                    value => {
                        combined.push_str(&value.to_string());
                        if !combined.ends_with('\n') {
                            combined.push('\n');
                        }
                    }
                }
            }
            Value::Text(combined.trim_end().to_owned())
        })
        .collect();
    Ok(values)
}

/// Computes the column of one rule.
pub fn derive_column(table: &Table, rule: &DerivedColumnRule) -> Result<Column, PpaReportError> {
    let values = match rule.kind {
        Aggregation::Currency => combine_columns_to_multiline(table, &rule.sources, currency_token)?,
        Aggregation::SignedEvolution => combine_columns_to_multiline(table, &rule.sources, evolution_token)?,
    };
    Ok(Column::new(rule.name.to_owned(), values))
}

/// Appends the column of every rule to `table`. Source columns are left untouched.
pub fn derive_columns(table: &mut Table, rules: &[DerivedColumnRule]) -> Result<(), PpaReportError> {
    for rule in rules {
        let column = derive_column(table, rule)?;
        log::debug!("derived column '{}' from {:?}", rule.name, rule.sources);
        table.push_column(column)?;
    }
    Ok(())
}
