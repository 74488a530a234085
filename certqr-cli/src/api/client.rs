//! Authenticated HTTP client shared by the Google collaborators

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::GoogleConfig;

/// Base URLs of the Google services the tool talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Sheets v4 REST root, e.g. `https://sheets.googleapis.com/v4`
    pub sheets: String,
    /// Drive v3 metadata root
    pub drive: String,
    /// Drive v3 upload root
    pub drive_upload: String,
    /// Spreadsheet document root used for PDF export
    pub docs: String,
}

impl From<&GoogleConfig> for Endpoints {
    fn from(config: &GoogleConfig) -> Self {
        Self {
            sheets: config.sheets_api.trim_end_matches('/').to_string(),
            drive: config.drive_api.trim_end_matches('/').to_string(),
            drive_upload: config.drive_upload_api.trim_end_matches('/').to_string(),
            docs: config.docs_base.trim_end_matches('/').to_string(),
        }
    }
}

/// reqwest client that attaches the session bearer token to every request
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    token: String,
    endpoints: Endpoints,
}

impl std::fmt::Debug for GoogleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleClient")
            .field("endpoints", &self.endpoints)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GoogleClient {
    pub fn new(token: impl Into<String>, endpoints: Endpoints) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("certqr/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            token: token.into(),
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Start a request with bearer authentication applied
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(&self.token)
    }

    /// Send a request and turn any non-success status into an error carrying the body
    pub async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("{}: request failed", what))?;

        let status = response.status();
        if status.is_success() {
            log::debug!("{}: {}", what, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{}: HTTP {} - {}", what, status, body.trim())
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        self.send(request, what)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("{}: failed to decode response", what))
    }
}
