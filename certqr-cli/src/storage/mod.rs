//! File storage for exported documents

pub mod drive;
pub mod local;

use anyhow::Result;
use async_trait::async_trait;

pub use drive::DriveStore;
pub use local::LocalFolderStore;

/// A file created by a [`FileStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    /// Where the user can open the file (a URL or an absolute path)
    pub location: String,
}

/// Creates named files in a default folder
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn create_file(&self, name: &str, mime_type: &str, content: Vec<u8>) -> Result<StoredFile>;
}
