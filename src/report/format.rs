//! Number formatters for report cells.

use crate::database::value::Value;
use serde::Deserialize;
use serde::Serialize;

/// Named formatter of a report column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatter {
    /// `$1,234.5k`
    Kdollar,
    /// `+3ₚₚ`
    PercentagePoints,
    /// `+12%`
    Pct,
    /// `–`, `✓`, `<1%`, `>99%` or a rounded percent
    DecimalToPercent,
}

impl Formatter {
    /// Formats numbers. Any other value is displayed unchanged.
    pub fn apply(&self, value: &Value) -> String {
        match value.as_number() {
            Some(number) => self.format(number),
            None => value.to_string(),
        }
    }

    pub fn format(&self, number: f64) -> String {
        match self {
            Formatter::Kdollar => kdollar(number),
            Formatter::PercentagePoints => percentage_points(number),
            Formatter::Pct => pct(number),
            Formatter::DecimalToPercent => decimal_to_percent(number),
        }
    }
}

/// Thousands of dollars with one decimal and grouped thousands, `1234500` → `$1,234.5k`.
pub fn kdollar(number: f64) -> String {
    format!("${}k", group_thousands(&format!("{:.1}", number / 1000.0)))
}

/// Signed whole percentage points, `3.2` → `+3ₚₚ`.
pub fn percentage_points(number: f64) -> String {
    format!("{:+.0}ₚₚ", number)
}

/// Signed whole percent of a ratio, `0.12` → `+12%`.
pub fn pct(number: f64) -> String {
    format!("{:+.0}%", number * 100.0)
}

/// Percent of a ratio for bar annotations.
pub fn decimal_to_percent(number: f64) -> String {
    if number == 0.0 {
        "–".to_owned()
    } else if number == 1.0 {
        "✓".to_owned()
    } else if number < 0.01 {
        "<1%".to_owned()
    } else if number > 0.99 {
        ">99%".to_owned()
    } else {
        format!("{}%", (number * 100.0).round_ties_even() as i64)
    }
}

/// Inserts `,` between groups of three digits in the integer part of a decimal string.
fn group_thousands(decimal: &str) -> String {
    let (sign, unsigned) = match decimal.strip_prefix('-') {
        Some(unsigned) => ("-", unsigned),
        None => ("", decimal),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(index) => unsigned.split_at(index),
        None => (unsigned, ""),
    };
    let digits = integer.as_bytes();
    let mut grouped = String::with_capacity(decimal.len() + digits.len() / 3);
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    format!("{sign}{grouped}{fraction}")
}
