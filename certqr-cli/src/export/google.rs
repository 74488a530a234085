//! Spreadsheet-to-PDF export through the Google Docs export endpoint

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;

use super::{DocumentExporter, ExportRequest};
use crate::api::GoogleClient;

#[derive(Debug, Clone)]
pub struct GoogleExporter {
    client: GoogleClient,
}

impl GoogleExporter {
    pub fn new(client: GoogleClient) -> Self {
        Self { client }
    }
}

/// Export URL for `request`, rooted at `docs_base` (e.g. `https://docs.google.com/spreadsheets/d`)
pub fn export_url(docs_base: &str, request: &ExportRequest) -> String {
    let layout = &request.layout;
    let target = &request.target;
    format!(
        "{}/{}/export?format=pdf\
         &portrait={}\
         &size={}\
         &gridlines={}\
         &printtitle={}\
         &top_margin={m}&bottom_margin={m}&left_margin={m}&right_margin={m}\
         &gid={}\
         &range={}",
        docs_base,
        urlencoding::encode(&target.spreadsheet_id),
        layout.portrait,
        urlencoding::encode(&layout.page_size),
        layout.gridlines,
        layout.print_title,
        target.sheet_id,
        target.range(),
        m = layout.margin,
    )
}

#[async_trait]
impl DocumentExporter for GoogleExporter {
    async fn export_pdf(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        let url = export_url(&self.client.endpoints().docs, request);
        log::info!("Exporting {} of '{}'", request.target.range(), request.target.sheet_name);
        log::debug!("Export URL: {}", url);

        let response = self
            .client
            .send(self.client.request(Method::GET, &url), "Export PDF")
            .await?;
        let bytes = response
            .bytes()
            .await
            .context("Failed to download exported PDF")?;

        if !bytes.starts_with(b"%PDF") {
            log::warn!("Export response does not look like a PDF ({} bytes)", bytes.len());
        }
        Ok(bytes.to_vec())
    }
}
