//! Uploaded-document storage.
//!
//! Documents live on disk under the configured upload root, at
//! `documents/<user_id>/<stem>_<millis><ext>`. The millisecond timestamp
//! keeps re-uploads of the same file name from colliding; the original stem
//! and extension are preserved so downloads keep a recognizable name.
//! Writes happen synchronously within the request that creates the order.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use orderdesk_core::UserId;

/// Errors from document storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem error reading or writing a document.
    #[error("document storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store for uploaded order documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at the given directory.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Relative storage path for a document.
    ///
    /// Any directory components in the submitted file name are discarded;
    /// only its base name survives into the stored path.
    #[must_use]
    pub fn document_rel_path(user_id: UserId, file_name: &str, timestamp_millis: i64) -> String {
        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        let (stem, ext) = split_base_name(base);

        format!("documents/{user_id}/{stem}_{timestamp_millis}{ext}")
    }

    /// Save a document for a user, returning its stored relative path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory or file cannot be written.
    pub async fn save(
        &self,
        user_id: UserId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let rel = Self::document_rel_path(user_id, file_name, Utc::now().timestamp_millis());
        let path = self.root.join(&rel);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;

        Ok(rel)
    }

    /// Open a stored document for streaming by its relative path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file is missing or unreadable -
    /// a database reference to a missing file is a server error, not a 404.
    pub async fn open(&self, rel_path: &str) -> Result<fs::File, StorageError> {
        Ok(fs::File::open(self.root.join(rel_path)).await?)
    }
}

/// Split a base file name into stem and extension (extension keeps its dot).
fn split_base_name(base: &str) -> (&str, &str) {
    match base.rfind('.') {
        Some(idx) if idx > 0 => base.split_at(idx),
        _ => (base, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_path_layout() {
        let rel = DocumentStore::document_rel_path(UserId::new(7), "report.pdf", 1_724_900_000_000);
        assert_eq!(rel, "documents/7/report_1724900000000.pdf");
    }

    #[test]
    fn test_rel_path_without_extension() {
        let rel = DocumentStore::document_rel_path(UserId::new(2), "notes", 1000);
        assert_eq!(rel, "documents/2/notes_1000");
    }

    #[test]
    fn test_rel_path_preserves_inner_dots() {
        let rel = DocumentStore::document_rel_path(UserId::new(2), "archive.tar.gz", 1000);
        assert_eq!(rel, "documents/2/archive.tar_1000.gz");
    }

    #[test]
    fn test_rel_path_strips_directories() {
        let rel = DocumentStore::document_rel_path(UserId::new(2), "../../etc/passwd.txt", 1000);
        assert_eq!(rel, "documents/2/passwd_1000.txt");
    }

    #[test]
    fn test_rel_path_dotfile_has_no_split() {
        let rel = DocumentStore::document_rel_path(UserId::new(2), ".env", 1000);
        assert_eq!(rel, "documents/2/.env_1000");
    }

    #[tokio::test]
    async fn test_save_and_open_roundtrip() {
        use tokio::io::AsyncReadExt;

        let dir = std::env::temp_dir().join(format!("orderdesk-store-{}", std::process::id()));
        let store = DocumentStore::new(dir.clone());

        let rel = store
            .save(UserId::new(9), "data.bin", b"hello bytes")
            .await
            .unwrap();
        assert!(rel.starts_with("documents/9/data_"));

        let mut bytes = Vec::new();
        store
            .open(&rel)
            .await
            .unwrap()
            .read_to_end(&mut bytes)
            .await
            .unwrap();
        assert_eq!(bytes, b"hello bytes");

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_open_missing_file_is_io_error() {
        let store = DocumentStore::new(std::env::temp_dir());
        assert!(matches!(
            store.open("documents/1/nope_0.pdf").await,
            Err(StorageError::Io(_))
        ));
    }
}
