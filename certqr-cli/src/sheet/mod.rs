//! Spreadsheet collaborators
//!
//! The certificate logic never touches a concrete spreadsheet. It reads rows through
//! [`RowSource`] and writes QR cells through [`CellSink`]; the backends below decide how a
//! cell becomes an image (for Google Sheets and xlsx that is an `IMAGE` formula).

pub mod cell;
pub mod google;
pub mod memory;
pub mod row;
pub mod xlsx;

use anyhow::Result;
use async_trait::async_trait;

pub use cell::Cell;
pub use google::GoogleSheet;
pub use memory::MemorySheet;
pub use row::{FIRST_DATA_ROW, Field, LAST_COLUMN_LETTER, QR_COLUMN, Row};
pub use xlsx::XlsxSheet;

/// Read side of a sheet
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Title of the sheet being processed
    fn sheet_name(&self) -> &str;

    /// Every row of the data range starting at row 1, header included
    async fn read_rows(&self) -> Result<Vec<Row>>;

    /// 1-based index of the last row holding any value; 0 for an empty sheet
    async fn last_row(&self) -> Result<u32>;
}

/// Write side of a sheet
#[async_trait]
pub trait CellSink: Send {
    /// Make the cell at (`row`, `column`) (both 1-based) render the image found at `url`
    async fn set_image_cell(&mut self, row: u32, column: u32, url: &str) -> Result<()>;

    /// Erase the contents of `column` for rows `first_row..=last_row` in one step
    async fn clear_column(&mut self, column: u32, first_row: u32, last_row: u32) -> Result<()>;

    /// Persist buffered writes. Remote sheets apply writes immediately.
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// 1-based index of the last grid row containing a non-empty cell
pub fn last_non_empty_row<R: AsRef<[Cell]>>(grid: &[R]) -> u32 {
    grid.iter()
        .rposition(|row| row.as_ref().iter().any(|c| !c.is_empty()))
        .map(|idx| idx as u32 + 1)
        .unwrap_or(0)
}

/// Column number (1-based) to spreadsheet letters
pub fn column_letter(column: u32) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
