use crate::database::value::Value;

/// Data types a column can hold.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// Double-precision floating point numbers
    Number,
    /// Variable-length strings
    Text,
    /// Date without time component
    Date,
    /// Time without date component
    Time,
    /// Date and time
    Timestamp,
}

impl ColumnType {
    /// Type of a single value, `None` for missing values.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Missing => None,
            Value::Number(_) => Some(ColumnType::Number),
            Value::Bool(_) => Some(ColumnType::Boolean),
            Value::Text(_) => Some(ColumnType::Text),
            Value::Date(_) => Some(ColumnType::Date),
            Value::Time(_) => Some(ColumnType::Time),
            Value::DateTime(_) => Some(ColumnType::Timestamp),
        }
    }

    /// Detects the common type of a set of values.
    /// Missing values are ignored; mixed or empty sets fall back to `Text`.
    pub fn detect<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
        let types: Vec<ColumnType> = values.into_iter().filter_map(ColumnType::of).collect();
        match types.first() {
            Some(first) if types.iter().all(|kind| kind == first) => *first,
            Some(_) if types.iter().all(|kind| kind.is_datetime()) => ColumnType::Timestamp,
            _ => ColumnType::Text,
        }
    }

    /// Returns true if this column type represents numeric values.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Number)
    }

    /// Returns true if this column type represents date/time related values.
    #[inline]
    pub fn is_datetime(&self) -> bool {
        matches!(self, ColumnType::Timestamp | ColumnType::Date | ColumnType::Time)
    }
}

/// A named column of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name (from header row, explicit names or generated)
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Common type of the non-missing values.
    pub fn kind(&self) -> ColumnType {
        ColumnType::detect(&self.values)
    }
}
