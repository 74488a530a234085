//! Bulk QR generation over every data row

use anyhow::{Context, Result};

use super::message::{FormattedRow, build_message};
use super::qr::{QrEndpoint, QrReference};
use crate::sheet::{CellSink, FIRST_DATA_ROW, QR_COLUMN, Row};

/// One QR cell written by [`generate_all`]
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub reference: QrReference,
    pub formatted: FormattedRow,
    pub message: String,
}

/// Result of a generation run, in input row order
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub codes: Vec<GeneratedCode>,
}

impl GenerateReport {
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Write one QR image cell per data row.
///
/// `rows` is the whole data range with the header at index 0. Rows are processed strictly
/// in order and every data row yields a write; the first sink failure aborts the run and
/// leaves earlier cells in place.
pub async fn generate_all<S>(rows: &[Row], sink: &mut S, endpoint: &QrEndpoint) -> Result<GenerateReport>
where
    S: CellSink + ?Sized,
{
    let mut report = GenerateReport::default();

    for (idx, row) in rows.iter().enumerate().skip(1) {
        let sheet_row = idx as u32 + 1;
        debug_assert!(sheet_row >= FIRST_DATA_ROW);

        let formatted = FormattedRow::from_row(row);
        let message = build_message(&formatted);
        let reference = endpoint.reference(sheet_row, QR_COLUMN, &message);

        log::debug!("Row {}: QR for student {}", sheet_row, formatted.student_id);

        sink.set_image_cell(reference.row, reference.column, &reference.url)
            .await
            .with_context(|| format!("Failed to write QR code for row {}", sheet_row))?;

        report.codes.push(GeneratedCode {
            reference,
            formatted,
            message,
        });
    }

    log::info!("Generated {} QR codes", report.len());
    Ok(report)
}
