//! Store files in the root folder of the user's Google Drive

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;

use super::{FileStore, StoredFile};
use crate::api::GoogleClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    web_view_link: Option<String>,
}

/// Uploads to Drive in two calls: the bytes, then the file name
#[derive(Debug, Clone)]
pub struct DriveStore {
    client: GoogleClient,
}

impl DriveStore {
    pub fn new(client: GoogleClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileStore for DriveStore {
    async fn create_file(&self, name: &str, mime_type: &str, content: Vec<u8>) -> Result<StoredFile> {
        let endpoints = self.client.endpoints();
        let size = content.len();

        let upload = self
            .client
            .request(Method::POST, &format!("{}/files", endpoints.drive_upload))
            .query(&[("uploadType", "media")])
            .header(CONTENT_TYPE, mime_type)
            .body(content);
        let uploaded: DriveFile = self
            .client
            .send_json(upload, "Upload file to Drive")
            .await?;
        log::debug!("Uploaded {} bytes to Drive as {}", size, uploaded.id);

        let rename = self
            .client
            .request(Method::PATCH, &format!("{}/files/{}", endpoints.drive, uploaded.id))
            .query(&[("fields", "id,name,webViewLink")])
            .json(&json!({ "name": name }));
        let file: DriveFile = self
            .client
            .send_json(rename, "Name Drive file")
            .await
            .with_context(|| format!("Uploaded file {} could not be renamed to {}", uploaded.id, name))?;

        let location = file
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", file.id));

        Ok(StoredFile {
            name: file.name.unwrap_or_else(|| name.to_string()),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_file_response() {
        let file: DriveFile = serde_json::from_str(
            r#"{ "id": "1xYz", "name": "Sheet1_QR_Codes.pdf",
                 "webViewLink": "https://drive.google.com/file/d/1xYz/view?usp=drivesdk" }"#,
        )
        .unwrap();
        assert_eq!(file.id, "1xYz");
        assert_eq!(file.name.as_deref(), Some("Sheet1_QR_Codes.pdf"));
        assert!(file.web_view_link.unwrap().contains("/1xYz/"));

        let bare: DriveFile = serde_json::from_str(r#"{ "id": "2" }"#).unwrap();
        assert!(bare.web_view_link.is_none());
    }
}
