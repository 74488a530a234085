//! Fixed column layout of the student sheet

use super::Cell;

/// Number of columns the layout reads and writes (A..I)
pub const ROW_WIDTH: usize = 9;

/// 1-based column that receives the QR image
pub const QR_COLUMN: u32 = Field::QrOutput as u32 + 1;

/// 1-based index of the first data row (row 1 is the header)
pub const FIRST_DATA_ROW: u32 = 2;

/// Letter of the last exported column, matching `ROW_WIDTH`
pub const LAST_COLUMN_LETTER: char = 'I';

/// Semantic position of each column in a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StudentName = 0,
    BranchName = 1,
    StudentId = 2,
    CourseName = 3,
    FatherName = 4,
    MotherName = 5,
    MobileNumber = 6,
    IssueDate = 7,
    QrOutput = 8,
}

impl Field {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One record of the sheet, padded to exactly `ROW_WIDTH` cells
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Build a row from raw cells; short rows are padded with `Cell::Empty`,
    /// columns beyond the layout are dropped
    pub fn new(mut cells: Vec<Cell>) -> Self {
        cells.resize(ROW_WIDTH, Cell::Empty);
        Self { cells }
    }

    pub fn get(&self, field: Field) -> &Cell {
        &self.cells[field.index()]
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Row {
    fn default() -> Self {
        Row::new(Vec::new())
    }
}

impl AsRef<[Cell]> for Row {
    fn as_ref(&self) -> &[Cell] {
        &self.cells
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        Row::new(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_row_is_padded() {
        let row = Row::new(vec![Cell::text("Rahim")]);
        assert_eq!(row.cells().len(), ROW_WIDTH);
        assert_eq!(row.get(Field::StudentName), &Cell::text("Rahim"));
        assert_eq!(row.get(Field::IssueDate), &Cell::Empty);
    }

    #[test]
    fn test_wide_row_is_truncated() {
        let cells = (0..12).map(|i| Cell::Number(i as f64)).collect();
        let row = Row::new(cells);
        assert_eq!(row.cells().len(), ROW_WIDTH);
        assert_eq!(row.get(Field::QrOutput), &Cell::Number(8.0));
    }

    #[test]
    fn test_qr_column_is_last_field() {
        assert_eq!(QR_COLUMN, 9);
        assert_eq!(QR_COLUMN as usize, ROW_WIDTH);
    }
}
