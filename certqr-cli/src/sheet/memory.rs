//! In-memory sheet used for dry runs and tests

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use super::{CellSink, Row, RowSource, column_letter, last_non_empty_row};

/// A write recorded by [`MemorySheet`]
#[derive(Debug, Clone, PartialEq)]
pub enum SheetWrite {
    Image { row: u32, column: u32, url: String },
    Clear { column: u32, first_row: u32, last_row: u32 },
}

impl fmt::Display for SheetWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetWrite::Image { row, column, url } => {
                write!(f, "image {}{} <- {}", column_letter(*column), row, url)
            }
            SheetWrite::Clear {
                column,
                first_row,
                last_row,
            } => {
                let col = column_letter(*column);
                write!(f, "clear {}{}:{}{}", col, first_row, col, last_row)
            }
        }
    }
}

/// Sheet held entirely in memory. Writes are journaled in order and image cells are kept
/// per (row, column) so callers can inspect the resulting state.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    name: String,
    rows: Vec<Row>,
    images: BTreeMap<(u32, u32), String>,
    writes: Vec<SheetWrite>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
            images: BTreeMap::new(),
            writes: Vec::new(),
        }
    }

    /// Every write in the order it was issued
    pub fn writes(&self) -> &[SheetWrite] {
        &self.writes
    }

    /// URL of the image currently placed at (row, column)
    #[cfg(test)]
    pub fn image_at(&self, row: u32, column: u32) -> Option<&str> {
        self.images.get(&(row, column)).map(String::as_str)
    }

    #[cfg(test)]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

#[async_trait]
impl RowSource for MemorySheet {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    async fn read_rows(&self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }

    async fn last_row(&self) -> Result<u32> {
        let by_value = last_non_empty_row(&self.rows);
        let by_image = self.images.keys().map(|(row, _)| *row).max().unwrap_or(0);
        Ok(by_value.max(by_image))
    }
}

#[async_trait]
impl CellSink for MemorySheet {
    async fn set_image_cell(&mut self, row: u32, column: u32, url: &str) -> Result<()> {
        self.images.insert((row, column), url.to_string());
        self.writes.push(SheetWrite::Image {
            row,
            column,
            url: url.to_string(),
        });
        Ok(())
    }

    async fn clear_column(&mut self, column: u32, first_row: u32, last_row: u32) -> Result<()> {
        self.images
            .retain(|(row, col), _| !(*col == column && (first_row..=last_row).contains(row)));
        self.writes.push(SheetWrite::Clear {
            column,
            first_row,
            last_row,
        });
        Ok(())
    }
}
