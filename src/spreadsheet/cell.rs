use crate::database::value::Value;
use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Types of cell data in a worksheet part.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as `0`/`1`
    Boolean,
    /// Plain numeric values
    Number,
    /// Date/time serials from the 1900 epoch
    NumberDateTime1900,
    /// Date serials from the 1900 epoch
    NumberDate1900,
    /// Time fractions, 1900 workbook
    NumberTime1900,
    /// Date/time serials from the 1904 epoch
    NumberDateTime1904,
    /// Date serials from the 1904 epoch
    NumberDate1904,
    /// Time fractions, 1904 workbook
    NumberTime1904,
    /// ISO 8601 date/time strings (`t="d"`)
    IsoDateTime,
    /// Inline or formula string values
    InlineString,
    /// Index into the shared string table
    SharedString,
    /// Error literals such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Maps built-in number format ids to date/time cell types.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Classifies a custom number format code by the date and time tokens
    /// found outside literals, escapes and `[...]` sections.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut has_date = false;
        let mut has_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => has_date = true,
                'H' | 'h' | 'S' | 's' => has_time = true,
                _ => (),
            }
        }

        match (has_date, has_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }
}

/// A worksheet cell with position, type and raw value text.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw value as stored in the part
    pub(crate) value: String,
}

impl Cell {
    /// Returns the A1-style reference of the cell.
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Converts the raw cell to a table value, resolving shared strings.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> Result<Value, String> {
        let value = match self.kind {
            CellType::Empty => Value::Missing,
            CellType::Boolean => Value::Bool(self.value == "1" || self.value.eq_ignore_ascii_case("true")),
            CellType::Number => Value::Number(self.to_double()?),
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                Value::Date(self.to_datetime()?.date())
            }
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                Value::Time(self.to_datetime()?.time())
            }
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                Value::DateTime(self.to_datetime()?)
            }
            CellType::IsoDateTime => parse_iso_datetime(&self.value)?,
            CellType::InlineString | CellType::Error => Value::Text(self.value.to_owned()),
            CellType::SharedString => {
                let index = self.value
                    .parse::<usize>()
                    .map_err(|_| format!("parse '{}' to shared string index failed", self.value))?;
                let text = shared_strings
                    .get(index)
                    .ok_or_else(|| format!("shared string {} out of range", index))?;
                Value::Text(text.to_owned())
            }
        };
        Ok(value)
    }

    fn to_double(&self) -> Result<f64, String> {
        self.value.trim().parse::<f64>().map_err(|_| format!("parse '{}' to double failed", self.value))
    }

    fn to_datetime(&self) -> Result<NaiveDateTime, String> {
        let is_1904 = matches!(
            self.kind,
            CellType::NumberDateTime1904 | CellType::NumberDate1904 | CellType::NumberTime1904
        );
        serial_to_datetime(self.to_double()?, is_1904)
            .ok_or_else(|| format!("parse '{}' to datetime failed", self.value))
    }
}

/// Converts a workbook serial date to a datetime.
/// Serials below 60 in the 1900 system are shifted by one day for the Lotus 1-2-3 leap year bug.
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    let mut days = serial.trunc() as i64;
    if !is_1904 && days < 60 {
        days += 1;
    }
    let epoch = if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let micros = (serial.fract() * 86_400_000_000f64).round() as i64;
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::microseconds(micros))
}

fn parse_iso_datetime(value: &str) -> Result<Value, String> {
    if value.contains('T') {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(Value::DateTime)
            .map_err(|_| format!("parse '{}' to NaiveDateTime failed", value))
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| format!("parse '{}' to NaiveDate failed", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell { row: 1, col: 2, kind, value: value.to_owned() }
    }

    #[test]
    fn builtin_formats() {
        assert_eq!(CellType::parse_builtin_number_format_id("14", false), Some(CellType::NumberDate1900));
        assert_eq!(CellType::parse_builtin_number_format_id("22", true), Some(CellType::NumberDateTime1904));
        assert_eq!(CellType::parse_builtin_number_format_id("9", false), None);
    }

    #[test]
    fn custom_formats() {
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd", false), CellType::NumberDate1900);
        assert_eq!(CellType::parse_custom_number_format("hh:mm:ss", false), CellType::NumberTime1900);
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd hh:mm", true), CellType::NumberDateTime1904);
        // Percent and currency formats stay numeric, even with letters inside literals or colors
        assert_eq!(CellType::parse_custom_number_format("0.0%", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("[Red]\"days\"#,##0", false), CellType::Number);
    }

    #[test]
    fn converts_numbers_and_text() {
        assert_eq!(cell(CellType::Number, "1234.5").to_value(&[]), Ok(Value::Number(1234.5)));
        assert_eq!(cell(CellType::Boolean, "1").to_value(&[]), Ok(Value::Bool(true)));
        assert_eq!(cell(CellType::InlineString, ",").to_value(&[]), Ok(Value::from(",")));
        assert_eq!(cell(CellType::Error, "#DIV/0!").to_value(&[]), Ok(Value::from("#DIV/0!")));
        assert!(cell(CellType::Number, "abc").to_value(&[]).is_err());
    }

    #[test]
    fn resolves_shared_strings() {
        let strings = vec!["A_HANDBAG".to_owned(), "sous_cat_hb".to_owned()];
        assert_eq!(cell(CellType::SharedString, "1").to_value(&strings), Ok(Value::from("sous_cat_hb")));
        assert!(cell(CellType::SharedString, "7").to_value(&strings).is_err());
    }

    #[test]
    fn converts_serial_dates() {
        let date = cell(CellType::NumberDate1900, "45352").to_value(&[]).unwrap();
        assert_eq!(date, Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));

        let early = cell(CellType::NumberDate1900, "1").to_value(&[]).unwrap();
        assert_eq!(early, Value::Date(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()));

        let time = cell(CellType::NumberTime1900, "0.5").to_value(&[]).unwrap();
        assert_eq!(time, Value::Time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));

        let date_1904 = cell(CellType::NumberDate1904, "0").to_value(&[]).unwrap();
        assert_eq!(date_1904, Value::Date(NaiveDate::from_ymd_opt(1904, 1, 1).unwrap()));
    }

    #[test]
    fn converts_iso_dates() {
        let value = cell(CellType::IsoDateTime, "2024-03-01T08:30:00").to_value(&[]).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(value, Value::DateTime(expected));
    }

    #[test]
    fn reference_of_cell() {
        assert_eq!(cell(CellType::Number, "0").reference(), "C2");
    }
}
