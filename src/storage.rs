//! On-disk storage for uploaded document bytes.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 16;

pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Unique storage name for an upload: a UUIDv7 followed by the original
    /// extension when it is short and alphanumeric.
    pub fn storage_name(original_filename: &str) -> String {
        let id = Uuid::now_v7();
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty()
                    && ext.len() <= MAX_EXTENSION_LEN
                    && ext.chars().all(|c| c.is_ascii_alphanumeric())
            });

        match extension {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        }
    }

    /// Write `bytes` under `name`, creating the root directory if needed.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub async fn open(&self, path: &Path) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(path).await
    }

    /// Remove a stored file. Returns `false` when it was already gone.
    pub async fn remove(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
