//! Store files in a folder on the local disk

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{FileStore, StoredFile};

#[derive(Debug, Clone)]
pub struct LocalFolderStore {
    folder: PathBuf,
}

impl LocalFolderStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

#[async_trait]
impl FileStore for LocalFolderStore {
    async fn create_file(&self, name: &str, _mime_type: &str, content: Vec<u8>) -> Result<StoredFile> {
        tokio::fs::create_dir_all(&self.folder)
            .await
            .with_context(|| format!("Failed to create folder: {}", self.folder.display()))?;

        let path = self.folder.join(name);
        tokio::fs::write(&path, &content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        let location = std::path::absolute(&path).unwrap_or(path);
        log::info!("Stored {} bytes at {}", content.len(), location.display());

        Ok(StoredFile {
            name: name.to_string(),
            location: location.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_folder_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFolderStore::new(dir.path().join("exports"));

        let stored = store
            .create_file("Sheet1_QR_Codes.pdf", "application/pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();

        let path = dir.path().join("exports").join("Sheet1_QR_Codes.pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(stored.name, "Sheet1_QR_Codes.pdf");
        assert!(stored.location.ends_with("Sheet1_QR_Codes.pdf"));
    }
}
