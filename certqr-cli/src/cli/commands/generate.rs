//! `certqr generate`

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use csv::Writer;

use super::source::{OpenedSheet, open_sheet};
use crate::certificate::{GenerateReport, QrEndpoint, generate_all};
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::sheet::{CellSink, MemorySheet, RowSource};

pub async fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let endpoint = config.qr.endpoint();
    let sheet = open_sheet(&args.source, config).await?;
    let target = sheet.describe();

    let report = match sheet {
        OpenedSheet::Google(mut sheet) => run(&mut sheet, args.dry_run, &endpoint).await?,
        OpenedSheet::Xlsx(mut sheet) => run(&mut sheet, args.dry_run, &endpoint).await?,
    };

    if let Some(path) = &args.report {
        write_report(&report, path)?;
        println!("Report written to {}", path.display().to_string().cyan());
    }

    if args.dry_run {
        for code in &report.codes {
            println!(
                "{} {}",
                format!("row {:>4}", code.reference.row).dimmed(),
                code.reference.url
            );
            log::debug!("Row {} message:\n{}", code.reference.row, code.message);
        }
        println!(
            "{} {} QR codes would be written (dry run)",
            "•".yellow(),
            report.len()
        );
    } else if report.is_empty() {
        println!("{} No student rows found, nothing was written", "•".yellow());
    } else {
        println!(
            "{} {} QR codes written to {}",
            "✓".bright_green().bold(),
            report.len(),
            target.cyan()
        );
    }

    Ok(())
}

/// Read every row and generate into `sheet`, or into a scratch copy for a dry run
async fn run<S>(sheet: &mut S, dry_run: bool, endpoint: &QrEndpoint) -> Result<GenerateReport>
where
    S: RowSource + CellSink,
{
    let rows = sheet.read_rows().await.context("Failed to read student rows")?;
    log::info!("Read {} rows from '{}'", rows.len(), sheet.sheet_name());

    if dry_run {
        let mut scratch = MemorySheet::new(sheet.sheet_name(), rows.clone());
        let report = generate_all(&rows, &mut scratch, endpoint).await?;
        for write in scratch.writes() {
            log::debug!("Dry run: {}", write);
        }
        return Ok(report);
    }

    let report = generate_all(&rows, sheet, endpoint).await?;
    sheet.flush().await.context("Failed to save the sheet")?;
    Ok(report)
}

/// Write one CSV line per generated QR code
pub fn write_report(report: &GenerateReport, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(["Row", "Student ID", "Student Name", "QR URL"])
        .context("Failed to write CSV header")?;

    for code in &report.codes {
        wtr.write_record([
            code.reference.row.to_string().as_str(),
            &code.formatted.student_id,
            &code.formatted.student_name,
            &code.reference.url,
        ])
        .with_context(|| format!("Failed to write row {}", code.reference.row))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    log::info!("CSV report exported to: {}", path.display());
    Ok(())
}
