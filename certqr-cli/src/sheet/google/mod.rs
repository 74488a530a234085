//! Google Sheets backend (Sheets v4 REST)

pub mod models;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use self::models::{Grid, SheetProperties, Spreadsheet};
use super::{CellSink, Row, RowSource, column_letter};
use crate::api::GoogleClient;
use crate::export::{ExportSource, ExportTarget};

const GRID_FIELDS: &str = "sheets(properties(sheetId,title,index),data(startRow,startColumn,rowData(values(effectiveValue,effectiveFormat/numberFormat/type,userEnteredValue/formulaValue))))";
const SHEET_FIELDS: &str = "sheets.properties(sheetId,title,index)";

/// One sheet of a Google spreadsheet
#[derive(Debug, Clone)]
pub struct GoogleSheet {
    client: GoogleClient,
    spreadsheet_id: String,
    properties: SheetProperties,
}

impl GoogleSheet {
    /// Resolve the sheet called `sheet_name`, or the first sheet when no name is given
    pub async fn open(client: GoogleClient, spreadsheet_id: &str, sheet_name: Option<&str>) -> Result<Self> {
        let url = format!(
            "{}/spreadsheets/{}",
            client.endpoints().sheets,
            urlencoding::encode(spreadsheet_id)
        );
        let request = client
            .request(Method::GET, &url)
            .query(&[("fields", SHEET_FIELDS)]);
        let spreadsheet: Spreadsheet = client
            .send_json(request, "Load spreadsheet metadata")
            .await?;

        let properties = select_sheet(
            spreadsheet.sheets.into_iter().map(|s| s.properties).collect(),
            sheet_name,
        )?;
        log::info!(
            "Using sheet '{}' (gid {}) of spreadsheet {}",
            properties.title,
            properties.sheet_id,
            spreadsheet_id
        );

        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.to_string(),
            properties,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn client(&self) -> &GoogleClient {
        &self.client
    }

    async fn read_grid(&self) -> Result<Grid> {
        let url = format!(
            "{}/spreadsheets/{}",
            self.client.endpoints().sheets,
            urlencoding::encode(&self.spreadsheet_id)
        );
        let request = self.client.request(Method::GET, &url).query(&[
            ("ranges", quote_sheet_title(&self.properties.title).as_str()),
            ("includeGridData", "true"),
            ("fields", GRID_FIELDS),
        ]);
        let spreadsheet: Spreadsheet = self
            .client
            .send_json(request, "Read sheet values")
            .await?;
        Ok(spreadsheet.into_grid())
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.client.endpoints().sheets,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        )
    }
}

#[async_trait]
impl RowSource for GoogleSheet {
    fn sheet_name(&self) -> &str {
        &self.properties.title
    }

    async fn read_rows(&self) -> Result<Vec<Row>> {
        let grid = self.read_grid().await?;
        let last = grid.last_row as usize;
        let mut rows: Vec<Row> = grid.cells.into_iter().take(last).map(Row::new).collect();
        rows.resize_with(last, Row::default);
        log::debug!("Read {} rows from '{}'", rows.len(), self.properties.title);
        Ok(rows)
    }

    async fn last_row(&self) -> Result<u32> {
        Ok(self.read_grid().await?.last_row)
    }
}

#[async_trait]
impl ExportSource for GoogleSheet {
    /// Region covering the whole data range of this sheet
    async fn export_target(&self) -> Result<ExportTarget> {
        Ok(ExportTarget {
            spreadsheet_id: self.spreadsheet_id.clone(),
            sheet_id: self.properties.sheet_id,
            sheet_name: self.properties.title.clone(),
            last_row: self.last_row().await?,
        })
    }
}

#[async_trait]
impl CellSink for GoogleSheet {
    async fn set_image_cell(&mut self, row: u32, column: u32, url: &str) -> Result<()> {
        let range = a1_range(&self.properties.title, column, row, row);
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[image_formula(url)]],
        });
        let request = self
            .client
            .request(Method::PUT, &self.values_url(&range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body);
        self.client
            .send(request, &format!("Write {}", range))
            .await?;
        Ok(())
    }

    async fn clear_column(&mut self, column: u32, first_row: u32, last_row: u32) -> Result<()> {
        let range = a1_range(&self.properties.title, column, first_row, last_row);
        let url = format!("{}:clear", self.values_url(&range));
        let request = self.client.request(Method::POST, &url).json(&json!({}));
        self.client
            .send(request, &format!("Clear {}", range))
            .await
            .with_context(|| format!("Failed to clear {}", range))?;
        Ok(())
    }
}

fn select_sheet(mut sheets: Vec<SheetProperties>, name: Option<&str>) -> Result<SheetProperties> {
    match name {
        Some(name) => {
            let titles: Vec<String> = sheets.iter().map(|s| s.title.clone()).collect();
            sheets
                .into_iter()
                .find(|s| s.title == name)
                .with_context(|| format!("Sheet '{}' not found. Available: {}", name, titles.join(", ")))
        }
        None => {
            sheets.sort_by_key(|s| s.index);
            sheets
                .into_iter()
                .next()
                .context("Spreadsheet has no sheets")
        }
    }
}

/// Sheet title quoted for A1 notation
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1 range of one column over `first_row..=last_row`
pub fn a1_range(title: &str, column: u32, first_row: u32, last_row: u32) -> String {
    let col = column_letter(column);
    if first_row == last_row {
        format!("{}!{}{}", quote_sheet_title(title), col, first_row)
    } else {
        format!("{}!{}{}:{}{}", quote_sheet_title(title), col, first_row, col, last_row)
    }
}

/// Cell formula that renders the image at `url`
pub fn image_formula(url: &str) -> String {
    format!("=IMAGE(\"{}\")", url.replace('"', "\"\""))
}
