//! PDF export of the QR sheet

pub mod google;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use google::GoogleExporter;

use crate::sheet::LAST_COLUMN_LETTER;

/// Page layout sent with every export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfLayout {
    pub portrait: bool,
    pub page_size: String,
    pub gridlines: bool,
    /// Repeat frozen header rows on every page
    pub print_title: bool,
    /// Margin in inches, applied to all four sides
    pub margin: f64,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            portrait: true,
            page_size: "A4".to_string(),
            gridlines: true,
            print_title: true,
            margin: 0.5,
        }
    }
}

/// Sheet region to export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    pub spreadsheet_id: String,
    /// Numeric sheet id (`gid`)
    pub sheet_id: i64,
    pub sheet_name: String,
    /// 1-based last row holding data
    pub last_row: u32,
}

impl ExportTarget {
    /// Rectangle covering the layout columns of every row, header included
    pub fn range(&self) -> String {
        format!("A1:{}{}", LAST_COLUMN_LETTER, self.last_row)
    }

    pub fn file_name(&self) -> String {
        format!("{}_QR_Codes.pdf", self.sheet_name)
    }
}

/// Fully described export call
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub target: ExportTarget,
    pub layout: PdfLayout,
}

/// Anything that can describe the region to export
#[async_trait]
pub trait ExportSource: Send + Sync {
    async fn export_target(&self) -> Result<ExportTarget>;
}

/// Host capability that renders a sheet region to PDF bytes
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export_pdf(&self, request: &ExportRequest) -> Result<Vec<u8>>;
}
