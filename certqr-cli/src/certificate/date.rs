//! Issue-date rendering

use chrono::Datelike;

use crate::sheet::Cell;

pub const NOT_AVAILABLE: &str = "N/A";

/// Render a date cell as `DD-MM-YYYY`.
///
/// Only a date-typed cell holding a valid instant is rendered; every other input yields
/// `"N/A"`. The calendar fields are taken as stored, with no timezone conversion, so the
/// output matches the local date shown by the sheet.
pub fn format_date(cell: &Cell) -> String {
    match cell {
        Cell::Date(Some(dt)) => format!("{:02}-{:02}-{}", dt.day(), dt.month(), dt.year()),
        _ => NOT_AVAILABLE.to_string(),
    }
}
