//! Resolving the sheet a command works on

use anyhow::{Context, Result};

use crate::api::{Endpoints, GoogleClient};
use crate::auth::resolve_access_token;
use crate::cli::SourceArgs;
use crate::config::Config;
use crate::sheet::xlsx::default_output_path;
use crate::sheet::{GoogleSheet, XlsxSheet};

/// The backend selected on the command line
pub enum OpenedSheet {
    Google(GoogleSheet),
    Xlsx(XlsxSheet),
}

impl OpenedSheet {
    pub fn describe(&self) -> String {
        match self {
            OpenedSheet::Google(sheet) => format!("spreadsheet {}", sheet.spreadsheet_id()),
            OpenedSheet::Xlsx(sheet) => sheet.output_path().display().to_string(),
        }
    }
}

/// Open a local workbook when `--xlsx` is given, the Google sheet otherwise
pub async fn open_sheet(args: &SourceArgs, config: &Config) -> Result<OpenedSheet> {
    if let Some(path) = &args.xlsx {
        if !path.exists() {
            anyhow::bail!("Excel file does not exist: {}", path.display());
        }
        let output = if args.in_place {
            path.clone()
        } else {
            args.output
                .clone()
                .unwrap_or_else(|| default_output_path(path))
        };
        let sheet_name = args.sheet.as_deref().or(config.google.sheet.as_deref());
        let sheet = XlsxSheet::open(path, sheet_name, output)?;
        return Ok(OpenedSheet::Xlsx(sheet));
    }

    let sheet = open_google_sheet(args.spreadsheet.as_deref(), args.sheet.as_deref(), config).await?;
    Ok(OpenedSheet::Google(sheet))
}

/// Build an authenticated client for the configured Google endpoints
pub fn google_client(config: &Config) -> Result<GoogleClient> {
    let token = resolve_access_token(&config.google)?;
    GoogleClient::new(token, Endpoints::from(&config.google))
}

pub async fn open_google_sheet(
    spreadsheet: Option<&str>,
    sheet: Option<&str>,
    config: &Config,
) -> Result<GoogleSheet> {
    let spreadsheet_id = spreadsheet
        .map(spreadsheet_id_from)
        .or_else(|| config.google.spreadsheet_id.clone())
        .context(
            "No spreadsheet given. Pass --spreadsheet, set google.spreadsheet_id in the config \
             or CERTQR_SPREADSHEET_ID in the environment.",
        )?;
    let sheet_name = sheet.or(config.google.sheet.as_deref());

    let client = google_client(config)?;
    GoogleSheet::open(client, &spreadsheet_id, sheet_name).await
}

/// Accept either a bare spreadsheet ID or a full `docs.google.com/spreadsheets/d/<id>/...` URL
pub fn spreadsheet_id_from(input: &str) -> String {
    let input = input.trim();
    match input.split_once("/spreadsheets/d/") {
        Some((_, rest)) => rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(rest)
            .to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id() {
        assert_eq!(spreadsheet_id_from(" 1AbC-xyz_9 "), "1AbC-xyz_9");
    }

    #[test]
    fn test_full_url() {
        assert_eq!(
            spreadsheet_id_from("https://docs.google.com/spreadsheets/d/1AbC-xyz/edit#gid=0"),
            "1AbC-xyz"
        );
        assert_eq!(
            spreadsheet_id_from("https://docs.google.com/spreadsheets/d/1AbC?usp=sharing"),
            "1AbC"
        );
        assert_eq!(spreadsheet_id_from("docs.google.com/spreadsheets/d/XYZ"), "XYZ");
    }

    #[tokio::test]
    async fn test_missing_workbook_is_reported() {
        let args = SourceArgs {
            xlsx: Some("/nonexistent/students.xlsx".into()),
            ..Default::default()
        };
        let err = match open_sheet(&args, &Config::default()).await {
            Ok(_) => panic!("opening a missing workbook should fail"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("does not exist"));
    }
}
