//! Tagged cell values read from a spreadsheet

use chrono::NaiveDateTime;

/// A single spreadsheet value, tagged by type so formatting can dispatch exhaustively
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Text value (may be empty)
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Date-typed value; `None` when the cell is a date that does not denote a valid instant
    Date(Option<NaiveDateTime>),
    /// Blank cell
    #[default]
    Empty,
}

impl Cell {
    /// Spreadsheet truthiness: empty text, zero, NaN, false and blank cells are falsy.
    /// Every date-typed value is truthy, including invalid ones.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Bool(b) => *b,
            Cell::Date(_) => true,
            Cell::Empty => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn date(value: NaiveDateTime) -> Self {
        Cell::Date(Some(value))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", format_number(*n)),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Date(Some(dt)) => write!(f, "{}", dt.format("%a %b %d %Y %H:%M:%S")),
            Cell::Date(None) => write!(f, "Invalid Date"),
            Cell::Empty => Ok(()),
        }
    }
}

/// Render a number the way the spreadsheet host stringifies it
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // covers -0.0
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        // shortest digits in exponent form, with an explicit sign on positive exponents
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truthiness() {
        assert!(!Cell::Empty.is_truthy());
        assert!(!Cell::text("").is_truthy());
        assert!(!Cell::Number(0.0).is_truthy());
        assert!(!Cell::Number(f64::NAN).is_truthy());
        assert!(!Cell::Bool(false).is_truthy());

        assert!(Cell::text(" ").is_truthy());
        assert!(Cell::Number(-1.5).is_truthy());
        assert!(Cell::Bool(true).is_truthy());
        assert!(Cell::Date(None).is_truthy());
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Cell::Number(1712345678.0).to_string(), "1712345678");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Number(-0.0).to_string(), "0");
        assert_eq!(Cell::Number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_number_display_switches_to_exponent() {
        assert_eq!(Cell::Number(1e21).to_string(), "1e+21");
        assert_eq!(Cell::Number(-1.2345e25).to_string(), "-1.2345e+25");
        assert_eq!(Cell::Number(999999999999999900000.0).to_string(), "999999999999999900000");

        assert_eq!(Cell::Number(1e-7).to_string(), "1e-7");
        assert_eq!(Cell::Number(-1.5e-7).to_string(), "-1.5e-7");
        assert_eq!(Cell::Number(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn test_date_display() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Cell::date(dt).to_string(), "Thu Mar 07 2024 00:00:00");
        assert_eq!(Cell::Date(None).to_string(), "Invalid Date");
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(Cell::Empty.to_string(), "");
        assert!(Cell::Empty.is_empty());
        assert!(Cell::text("").is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }
}
