use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use std::fmt::Display;

/// A single scalar in a table column.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No data. Distinct from zero and from empty text.
    #[default]
    Missing,
    Number(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns the number if this value is numeric. Booleans are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => Ok(()),
            // Whole numbers print without a fractional part so that codes read as "12", not "12.0"
            Value::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => write!(f, "{}", *number as i64),
            Value::Number(number) => write!(f, "{}", number),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Text(text) => write!(f, "{}", text),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::Time(time) => write!(f, "{}", time.format("%H:%M:%S")),
            Value::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Missing.to_string(), "");
        assert_eq!(Value::from(12.0).to_string(), "12");
        assert_eq!(Value::from(-3.0).to_string(), "-3");
        assert_eq!(Value::from(0.25).to_string(), "0.25");
        assert_eq!(Value::from("A_HANDBAG").to_string(), "A_HANDBAG");
        assert_eq!(Value::from(true).to_string(), "true");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-03-01");
    }

    #[test]
    fn numeric_dispatch() {
        assert_eq!(Value::from(1.5).as_number(), Some(1.5));
        assert_eq!(Value::from("1.5").as_number(), None);
        assert_eq!(Value::from(true).as_number(), None);
        assert_eq!(Value::Missing.as_number(), None);
    }

    #[test]
    fn optional_values() {
        assert_eq!(Value::from(None::<f64>), Value::Missing);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_owned()));
    }
}
