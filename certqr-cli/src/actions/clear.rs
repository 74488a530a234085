//! Clear every generated QR code from the sheet

use anyhow::{Context, Result};

use super::Outcome;
use crate::prompt::Prompt;
use crate::sheet::{CellSink, FIRST_DATA_ROW, QR_COLUMN, RowSource};

/// Rows whose QR cell was cleared, inclusive. `None` when the sheet had no data rows.
pub type ClearedRange = Option<(u32, u32)>;

/// Ask for confirmation, then erase the QR column for every data row in one step
pub async fn clear_qr_codes<S>(sheet: &mut S, prompt: &dyn Prompt) -> Result<Outcome<ClearedRange>>
where
    S: RowSource + CellSink,
{
    let confirmed = prompt.confirm(
        "Clear QR Codes",
        "Are you sure you want to clear all QR codes?",
    )?;

    if !confirmed {
        log::info!("QR code clearing was canceled by the user.");
        prompt.notify("Action Canceled", "QR codes were not cleared.");
        return Ok(Outcome::Canceled);
    }

    let last_row = sheet
        .last_row()
        .await
        .context("Failed to determine the last row of the sheet")?;

    let cleared = if last_row >= FIRST_DATA_ROW {
        sheet
            .clear_column(QR_COLUMN, FIRST_DATA_ROW, last_row)
            .await
            .context("Failed to clear QR codes")?;
        sheet.flush().await?;
        Some((FIRST_DATA_ROW, last_row))
    } else {
        log::warn!("Sheet '{}' has no data rows, nothing to clear", sheet.sheet_name());
        None
    };

    prompt.notify(
        "QR Codes Cleared!",
        "All QR codes have been cleared from the sheet.",
    );
    log::info!("QR Codes were cleared successfully.");

    Ok(Outcome::Done(cleared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::ScriptedPrompt;
    use crate::sheet::memory::SheetWrite;
    use crate::sheet::{Cell, MemorySheet, Row};

    fn sheet_with_rows(n: usize) -> MemorySheet {
        let mut rows = vec![Row::new(vec![Cell::text("Student Name")])];
        for i in 0..n {
            rows.push(Row::new(vec![Cell::text(format!("Student {}", i))]));
        }
        MemorySheet::new("Sheet1", rows)
    }

    #[tokio::test]
    async fn test_cancel_leaves_sheet_untouched() {
        let mut sheet = sheet_with_rows(3);
        sheet.set_image_cell(2, QR_COLUMN, "x").await.unwrap();
        let prompt = ScriptedPrompt::answering(false);

        let outcome = clear_qr_codes(&mut sheet, &prompt).await.unwrap();

        assert_eq!(outcome, Outcome::Canceled);
        assert_eq!(sheet.writes().len(), 1);
        assert_eq!(sheet.image_at(2, QR_COLUMN), Some("x"));
        assert_eq!(prompt.titles(), ["Clear QR Codes", "Action Canceled"]);
    }

    #[tokio::test]
    async fn test_confirm_clears_all_data_rows() {
        let mut sheet = sheet_with_rows(3);
        for row in 2..=4 {
            sheet.set_image_cell(row, QR_COLUMN, "x").await.unwrap();
        }
        let prompt = ScriptedPrompt::answering(true);

        let outcome = clear_qr_codes(&mut sheet, &prompt).await.unwrap();

        assert_eq!(outcome, Outcome::Done(Some((2, 4))));
        assert_eq!(
            sheet.writes().last(),
            Some(&SheetWrite::Clear {
                column: QR_COLUMN,
                first_row: 2,
                last_row: 4
            })
        );
        assert_eq!(sheet.image_count(), 0);
        assert_eq!(prompt.titles(), ["Clear QR Codes", "QR Codes Cleared!"]);
    }

    #[tokio::test]
    async fn test_header_only_sheet_clears_nothing() {
        let mut sheet = sheet_with_rows(0);
        let prompt = ScriptedPrompt::answering(true);

        let outcome = clear_qr_codes(&mut sheet, &prompt).await.unwrap();

        assert_eq!(outcome, Outcome::Done(None));
        assert!(sheet.writes().is_empty());
    }
}
