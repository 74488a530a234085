//! Local `.xlsx` workbook backend
//!
//! The workbook is read once with calamine (values and formulas of every sheet) and
//! written back with rust_xlsxwriter on flush. Cell styling is not carried over.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_xlsxwriter::{Format, Workbook};

use super::google::image_formula;
use super::{Cell, CellSink, Row, RowSource, last_non_empty_row};

/// One worksheet held in memory; positions are 0-based (row, column)
#[derive(Debug, Clone, Default)]
struct SheetData {
    name: String,
    values: Vec<Vec<Cell>>,
    formulas: BTreeMap<(u32, u16), String>,
}

impl SheetData {
    fn set_value(&mut self, row: u32, col: u16, cell: Cell) {
        let (r, c) = (row as usize, col as usize);
        if self.values.len() <= r {
            self.values.resize_with(r + 1, Vec::new);
        }
        let target = &mut self.values[r];
        if target.len() <= c {
            target.resize(c + 1, Cell::Empty);
        }
        target[c] = cell;
    }

    fn last_row(&self) -> u32 {
        let by_formula = self.formulas.keys().map(|(r, _)| r + 1).max().unwrap_or(0);
        last_non_empty_row(&self.values).max(by_formula)
    }
}

/// A sheet of a local workbook
#[derive(Debug)]
pub struct XlsxSheet {
    output: PathBuf,
    sheets: Vec<SheetData>,
    active: usize,
}

impl XlsxSheet {
    /// Load `path` and select `sheet_name` (the first sheet when `None`).
    /// Changes are saved to `output` on flush.
    pub fn open(path: &Path, sheet_name: Option<&str>, output: PathBuf) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let names = workbook.sheet_names();
        if names.is_empty() {
            anyhow::bail!("Excel file has no sheets: {}", path.display());
        }

        let active = match sheet_name {
            Some(name) => names.iter().position(|n| n == name).with_context(|| {
                format!("Sheet '{}' not found. Available: {}", name, names.join(", "))
            })?,
            None => 0,
        };

        let mut sheets = Vec::with_capacity(names.len());
        for name in &names {
            sheets.push(read_sheet(&mut workbook, name)?);
        }

        log::info!(
            "Loaded '{}' from {} ({} rows)",
            names[active],
            path.display(),
            sheets[active].last_row()
        );

        Ok(Self {
            output,
            sheets,
            active,
        })
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    fn sheet(&self) -> &SheetData {
        &self.sheets[self.active]
    }

    fn sheet_mut(&mut self) -> &mut SheetData {
        &mut self.sheets[self.active]
    }

    /// Write every sheet to the output path
    pub fn save(&self) -> Result<()> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        let datetime_format = Format::new().set_num_format("dd/mm/yyyy hh:mm:ss");

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (r, row) in sheet.values.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    let (r, c) = (r as u32, c as u16);
                    if sheet.formulas.contains_key(&(r, c)) {
                        continue;
                    }
                    match cell {
                        Cell::Text(s) => {
                            worksheet.write_string(r, c, s)?;
                        }
                        Cell::Number(n) => {
                            worksheet.write_number(r, c, *n)?;
                        }
                        Cell::Bool(b) => {
                            worksheet.write_boolean(r, c, *b)?;
                        }
                        Cell::Date(Some(dt)) => {
                            let format = if dt.time().num_seconds_from_midnight() == 0 {
                                &date_format
                            } else {
                                &datetime_format
                            };
                            worksheet.write_datetime_with_format(r, c, dt, format)?;
                        }
                        Cell::Date(None) | Cell::Empty => {}
                    }
                }
            }

            for ((r, c), formula) in &sheet.formulas {
                worksheet.write_formula(*r, *c, formula.as_str())?;
            }
        }

        workbook
            .save(&self.output)
            .with_context(|| format!("Failed to save Excel file: {}", self.output.display()))?;
        log::info!("Workbook saved to {}", self.output.display());
        Ok(())
    }
}

fn read_sheet<R>(workbook: &mut Xlsx<R>, name: &str) -> Result<SheetData>
where
    R: std::io::Read + std::io::Seek,
{
    let mut sheet = SheetData {
        name: name.to_string(),
        ..Default::default()
    };

    let range = workbook
        .worksheet_range(name)
        .with_context(|| format!("Failed to read sheet: {}", name))?;
    if let Some((start_row, start_col)) = range.start() {
        for (r, c, data) in range.used_cells() {
            sheet.set_value(start_row + r as u32, (start_col as usize + c) as u16, cell_from_data(data));
        }
    }

    let formulas = workbook
        .worksheet_formula(name)
        .with_context(|| format!("Failed to read formulas of sheet: {}", name))?;
    if let Some((start_row, start_col)) = formulas.start() {
        for (r, c, formula) in formulas.used_cells() {
            if formula.is_empty() {
                continue;
            }
            let key = (start_row + r as u32, (start_col as usize + c) as u16);
            // future-function prefixes are added back by the writer
            let formula = formula.replace("_xlfn.", "");
            let formula = if formula.starts_with('=') {
                formula
            } else {
                format!("={}", formula)
            };
            sheet.formulas.insert(key, formula);
        }
    }

    Ok(sheet)
}

/// Map a calamine value onto the tagged cell type
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => Cell::Number(dt.as_f64()),
        Data::DateTime(dt) => Cell::Date(dt.as_datetime()),
        Data::DateTimeIso(s) => Cell::Date(parse_iso_datetime(s)),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[async_trait]
impl RowSource for XlsxSheet {
    fn sheet_name(&self) -> &str {
        &self.sheet().name
    }

    async fn read_rows(&self) -> Result<Vec<Row>> {
        let sheet = self.sheet();
        let last = sheet.last_row() as usize;
        let mut rows: Vec<Row> = sheet
            .values
            .iter()
            .take(last)
            .map(|cells| Row::new(cells.clone()))
            .collect();
        rows.resize_with(last, Row::default);
        Ok(rows)
    }

    async fn last_row(&self) -> Result<u32> {
        Ok(self.sheet().last_row())
    }
}

#[async_trait]
impl CellSink for XlsxSheet {
    async fn set_image_cell(&mut self, row: u32, column: u32, url: &str) -> Result<()> {
        let (r, c) = to_zero_based(row, column)?;
        let sheet = self.sheet_mut();
        sheet.set_value(r, c, Cell::Empty);
        sheet.formulas.insert((r, c), image_formula(url));
        Ok(())
    }

    async fn clear_column(&mut self, column: u32, first_row: u32, last_row: u32) -> Result<()> {
        let sheet = self.sheet_mut();
        for row in first_row..=last_row {
            let (r, c) = to_zero_based(row, column)?;
            sheet.formulas.remove(&(r, c));
            if let Some(cell) = sheet.values.get_mut(r as usize).and_then(|cells| cells.get_mut(c as usize)) {
                *cell = Cell::Empty;
            }
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.save()
    }
}

fn to_zero_based(row: u32, column: u32) -> Result<(u32, u16)> {
    if row == 0 || column == 0 {
        anyhow::bail!("Cell positions are 1-based, got ({}, {})", row, column);
    }
    let col = u16::try_from(column - 1).context("Column out of range")?;
    Ok((row - 1, col))
}

/// Default output path for a workbook: `<stem>_qr.xlsx` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    input.with_file_name(format!("{}_qr.xlsx", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{QrEndpoint, generate_all};
    use crate::sheet::{Field, QR_COLUMN};
    use calamine::CellErrorType;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");

        let sheet = workbook.add_worksheet();
        sheet.set_name("Students").unwrap();
        let header = [
            "Student Name", "Branch", "Student ID", "Course", "Father", "Mother", "Mobile",
            "Issue Date", "QR",
        ];
        for (c, title) in header.iter().enumerate() {
            sheet.write_string(0, c as u16, *title).unwrap();
        }

        sheet.write_string(1, 0, "Abdur Rahim").unwrap();
        sheet.write_string(1, 1, "DHAKA north").unwrap();
        sheet.write_number(1, 2, 20240017.0).unwrap();
        sheet.write_string(1, 3, "diploma").unwrap();
        sheet.write_number(1, 6, 1712345678.0).unwrap();
        let issued = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
        sheet.write_datetime_with_format(1, 7, &issued, &date_format).unwrap();

        sheet.write_string(2, 0, "Karim").unwrap();
        sheet.write_string(2, 7, "07-03-2024").unwrap();

        let other = workbook.add_worksheet();
        other.set_name("Notes").unwrap();
        other.write_string(0, 0, "keep me").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Int(5)), Cell::Number(5.0));
        assert_eq!(cell_from_data(&Data::String("x".into())), Cell::text("x"));
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Error(CellErrorType::NA)), Cell::text("#N/A"));
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2024-03-07".into())),
            Cell::date(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(cell_from_data(&Data::DateTimeIso("soon".into())), Cell::Date(None));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/batch.xlsx")),
            PathBuf::from("/data/batch_qr.xlsx")
        );
    }

    #[tokio::test]
    async fn test_generate_and_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("students.xlsx");
        let output = dir.path().join("students_qr.xlsx");
        write_fixture(&input);

        let mut sheet = XlsxSheet::open(&input, None, output.clone()).unwrap();
        assert_eq!(sheet.sheet_name(), "Students");

        let rows = sheet.read_rows().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(matches!(rows[1].get(Field::IssueDate), Cell::Date(Some(_))));
        assert_eq!(rows[2].get(Field::IssueDate), &Cell::text("07-03-2024"));

        let report = generate_all(&rows, &mut sheet, &QrEndpoint::default())
            .await
            .unwrap();
        assert_eq!(report.len(), 2);
        assert!(report.codes[0].message.contains("Issue Date: 07-03-2024\r\n"));
        assert!(report.codes[1].message.contains("Issue Date: N/A\r\n"));
        sheet.flush().await.unwrap();

        let mut written: Xlsx<_> = open_workbook(&output).unwrap();
        assert_eq!(written.sheet_names(), vec!["Students".to_string(), "Notes".to_string()]);
        let formulas = written.worksheet_formula("Students").unwrap();
        let qr_col = QR_COLUMN - 1;
        for row in [1u32, 2] {
            let formula = formulas.get_value((row, qr_col)).cloned().unwrap_or_default();
            assert!(formula.contains("IMAGE(\"https://quickchart.io/qr?text="), "row {}: {}", row, formula);
        }
        let notes = written.worksheet_range("Notes").unwrap();
        assert_eq!(notes.get_value((0, 0)), Some(&Data::String("keep me".into())));

        let mut reopened = XlsxSheet::open(&output, Some("Students"), output.clone()).unwrap();
        assert_eq!(reopened.last_row().await.unwrap(), 3);
        reopened.clear_column(QR_COLUMN, 2, 3).await.unwrap();
        reopened.flush().await.unwrap();

        let mut cleared: Xlsx<_> = open_workbook(&output).unwrap();
        let formulas = cleared.worksheet_formula("Students").unwrap();
        assert!(formulas.used_cells().all(|(_, _, f)| !f.contains("IMAGE")));
    }

    #[test]
    fn test_unknown_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("students.xlsx");
        write_fixture(&input);

        let err = XlsxSheet::open(&input, Some("Missing"), default_output_path(&input)).unwrap_err();
        assert!(err.to_string().contains("Available: Students, Notes"));
    }
}
