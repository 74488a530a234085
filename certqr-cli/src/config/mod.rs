//! Configuration file handling
//!
//! Settings live in `<config dir>/certqr/config.toml`. Every field has a default, so a
//! missing file (or a partial one) is valid. A few values can be overridden from the
//! environment, which `main` populates from `.env` via dotenvy.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::certificate::QrEndpoint;
use crate::certificate::qr::{DEFAULT_QR_ENDPOINT, DEFAULT_QR_SIZE};
use crate::export::PdfLayout;

pub const ENV_SPREADSHEET_ID: &str = "CERTQR_SPREADSHEET_ID";
pub const ENV_SHEET: &str = "CERTQR_SHEET";
pub const DEFAULT_TOKEN_ENV: &str = "CERTQR_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub qr: QrConfig,
    pub google: GoogleConfig,
    pub export: PdfLayout,
    pub storage: StorageConfig,
}

/// QR rendering service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    pub endpoint: String,
    /// Image edge in pixels
    pub size: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_QR_ENDPOINT.to_string(),
            size: DEFAULT_QR_SIZE,
        }
    }
}

impl QrConfig {
    pub fn endpoint(&self) -> QrEndpoint {
        QrEndpoint::new(self.endpoint.clone(), self.size)
    }
}

/// Google spreadsheet, credential and API roots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub spreadsheet_id: Option<String>,
    /// Sheet title; the first sheet when unset
    pub sheet: Option<String>,
    /// Environment variable holding the OAuth access token
    pub token_env: String,
    pub sheets_api: String,
    pub drive_api: String,
    pub drive_upload_api: String,
    pub docs_base: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            sheets_api: "https://sheets.googleapis.com/v4".to_string(),
            drive_api: "https://www.googleapis.com/drive/v3".to_string(),
            drive_upload_api: "https://www.googleapis.com/upload/drive/v3".to_string(),
            docs_base: "https://docs.google.com/spreadsheets/d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageTarget {
    /// Root folder of the user's Google Drive
    #[default]
    Drive,
    /// A folder on the local disk
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub target: StorageTarget,
    /// Folder for local storage; the documents directory when unset
    pub folder: Option<PathBuf>,
}

impl StorageConfig {
    pub fn local_folder(&self) -> Result<PathBuf> {
        match &self.folder {
            Some(folder) => Ok(folder.clone()),
            None => dirs::document_dir()
                .or_else(dirs::home_dir)
                .context("Could not determine a default folder for exported files"),
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(dir.join("certqr").join("config.toml"))
}

impl Config {
    /// Load from `path` (or the default location) and apply environment overrides.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf)> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(ENV_SPREADSHEET_ID).filter(|v| !v.trim().is_empty()) {
            self.google.spreadsheet_id = Some(id.trim().to_string());
        }
        if let Some(sheet) = lookup(ENV_SHEET).filter(|v| !v.trim().is_empty()) {
            self.google.sheet = Some(sheet);
        }
    }

    /// Write the default configuration to `path`, refusing to overwrite an existing file
    pub fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, Self::default().to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
