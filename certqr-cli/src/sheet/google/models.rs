//! Sheets v4 response models (only the fields this tool requests)

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Deserialize;

use crate::sheet::{Cell, last_non_empty_row};

#[derive(Debug, Deserialize)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SheetEntry {
    pub properties: SheetProperties,
    #[serde(default)]
    pub data: Vec<GridData>,
}

/// Zero-valued fields are omitted on the wire, hence the defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default)]
    pub start_row: usize,
    #[serde(default)]
    pub start_column: usize,
    #[serde(default)]
    pub row_data: Vec<RowData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub effective_value: Option<ExtendedValue>,
    pub effective_format: Option<CellFormat>,
    pub user_entered_value: Option<UserEnteredValue>,
}

/// Only the formula is requested from the user-entered side
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEnteredValue {
    pub formula_value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedValue {
    pub number_value: Option<f64>,
    pub string_value: Option<String>,
    pub bool_value: Option<bool>,
    pub error_value: Option<ErrorValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorValue {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub number_format: Option<NumberFormat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NumberFormat {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl CellData {
    fn is_date_formatted(&self) -> bool {
        let kind = self
            .effective_format
            .as_ref()
            .and_then(|f| f.number_format.as_ref())
            .and_then(|n| n.kind.as_deref());
        matches!(kind, Some("DATE" | "DATE_TIME" | "TIME"))
    }

    /// Formula cells count as used even when they evaluate to nothing (an `IMAGE` cell)
    fn has_formula(&self) -> bool {
        self.user_entered_value
            .as_ref()
            .and_then(|v| v.formula_value.as_deref())
            .is_some_and(|f| !f.is_empty())
    }

    /// Typed value of the cell; date-formatted numbers become dates
    pub fn to_cell(&self) -> Cell {
        let Some(value) = &self.effective_value else {
            return Cell::Empty;
        };

        if let Some(n) = value.number_value {
            if self.is_date_formatted() {
                return Cell::Date(serial_to_datetime(n));
            }
            return Cell::Number(n);
        }
        if let Some(s) = &value.string_value {
            return Cell::Text(s.clone());
        }
        if let Some(b) = value.bool_value {
            return Cell::Bool(b);
        }
        if let Some(err) = &value.error_value {
            return Cell::Text(error_code(err.kind.as_deref()).to_string());
        }
        Cell::Empty
    }
}

/// Display code of a formula error, as the sheet shows it
fn error_code(kind: Option<&str>) -> &'static str {
    match kind {
        Some("NULL_VALUE") => "#NULL!",
        Some("DIVIDE_BY_ZERO") => "#DIV/0!",
        Some("VALUE") => "#VALUE!",
        Some("REF") => "#REF!",
        Some("NAME") => "#NAME?",
        Some("NUM") => "#NUM!",
        Some("N_A") => "#N/A",
        Some("LOADING") => "Loading...",
        _ => "#ERROR!",
    }
}

/// Convert a spreadsheet serial number (days since 1899-12-30) to a wall-clock date time.
/// Returns `None` when the serial is not a representable instant.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    const MS_PER_DAY: f64 = 86_400_000.0;

    if !serial.is_finite() || serial.abs() > 3_000_000.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MS_PER_DAY).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

/// Typed cells of one sheet plus the last used row
#[derive(Debug, Default)]
pub struct Grid {
    pub cells: Vec<Vec<Cell>>,
    /// 1-based last row holding a value or a formula; 0 for an empty sheet
    pub last_row: u32,
}

impl Spreadsheet {
    /// Dense grid of the first sheet's data, anchored at A1
    pub fn into_grid(self) -> Grid {
        let mut grid: Vec<Vec<Cell>> = Vec::new();
        let mut last_formula_row = 0;
        let Some(sheet) = self.sheets.into_iter().next() else {
            return Grid::default();
        };

        for block in sheet.data {
            for (r, row) in block.row_data.iter().enumerate() {
                let row_idx = block.start_row + r;
                if grid.len() <= row_idx {
                    grid.resize_with(row_idx + 1, Vec::new);
                }
                if row.values.iter().any(CellData::has_formula) {
                    last_formula_row = last_formula_row.max(row_idx as u32 + 1);
                }
                for (c, cell) in row.values.iter().enumerate() {
                    let col_idx = block.start_column + c;
                    let target = &mut grid[row_idx];
                    if target.len() <= col_idx {
                        target.resize(col_idx + 1, Cell::Empty);
                    }
                    target[col_idx] = cell.to_cell();
                }
            }
        }

        let last_row = last_non_empty_row(&grid).max(last_formula_row);
        Grid {
            cells: grid,
            last_row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = r#"{
      "sheets": [{
        "properties": { "title": "Batch 7" },
        "data": [{
          "rowData": [
            { "values": [ { "effectiveValue": { "stringValue": "Student Name" } } ] },
            { "values": [
                { "effectiveValue": { "stringValue": "Rahim" } },
                {},
                { "effectiveValue": { "numberValue": 20240017 } },
                { "effectiveValue": { "boolValue": true } },
                { "effectiveValue": { "errorValue": { "type": "N_A", "message": "not found" } } },
                {},
                {},
                { "effectiveValue": { "numberValue": 45358 },
                  "effectiveFormat": { "numberFormat": { "type": "DATE", "pattern": "dd/mm/yyyy" } } }
            ] }
          ]
        }]
      }]
    }"#;

    #[test]
    fn test_grid_cells_are_typed() {
        let spreadsheet: Spreadsheet = serde_json::from_str(GRID).unwrap();
        let grid = spreadsheet.into_grid().cells;

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec![Cell::text("Student Name")]);
        let row = &grid[1];
        assert_eq!(row[0], Cell::text("Rahim"));
        assert_eq!(row[1], Cell::Empty);
        assert_eq!(row[2], Cell::Number(20240017.0));
        assert_eq!(row[3], Cell::Bool(true));
        assert_eq!(row[4], Cell::text("#N/A"));
        assert_eq!(
            row[7],
            Cell::date(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_grid_honours_offsets() {
        let json = r#"{ "sheets": [{ "properties": { "sheetId": 5, "title": "S", "index": 1 },
            "data": [{ "startRow": 2, "startColumn": 1,
                       "rowData": [{ "values": [{ "effectiveValue": { "numberValue": 1 } }] }] }] }] }"#;
        let spreadsheet: Spreadsheet = serde_json::from_str(json).unwrap();
        assert_eq!(spreadsheet.sheets[0].properties.sheet_id, 5);

        let grid = spreadsheet.into_grid();
        assert_eq!(grid.last_row, 3);
        assert_eq!(grid.cells.len(), 3);
        assert_eq!(grid.cells[2], vec![Cell::Empty, Cell::Number(1.0)]);
    }

    #[test]
    fn test_formula_only_rows_count_as_used() {
        let json = r#"{ "sheets": [{ "properties": { "title": "S" },
            "data": [{ "rowData": [
                { "values": [{ "effectiveValue": { "stringValue": "Student Name" } }] },
                { "values": [{ "effectiveValue": { "stringValue": "Rahim" } }] },
                { "values": [{}, {}, {}, {}, {}, {}, {}, {},
                             { "userEnteredValue": { "formulaValue": "=IMAGE(\"https://quickchart.io/qr?text=x\")" } }] }
            ] }] }] }"#;
        let spreadsheet: Spreadsheet = serde_json::from_str(json).unwrap();

        let grid = spreadsheet.into_grid();
        assert_eq!(grid.last_row, 3);
        assert!(grid.cells[2].iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_serial_dates() {
        let dt = serial_to_datetime(45358.5).unwrap();
        assert_eq!(dt.to_string(), "2024-03-07 12:00:00");
        assert_eq!(serial_to_datetime(0.0).unwrap().to_string(), "1899-12-30 00:00:00");
        assert_eq!(serial_to_datetime(f64::NAN), None);
        assert_eq!(serial_to_datetime(1e300), None);
    }
}
