//! Disk storage for uploaded attachments.
//!
//! Files land in `<root>/bills/` under a generated name and are served
//! read-only from `/uploads/bills/<name>`.

use std::path::{Path, PathBuf};

use flowiq_core::validation::UPLOADS_PATH;
use uuid::Uuid;

const BILLS_DIR: &str = "bills";

/// A file written by [`AttachmentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Public URL path, e.g. `/uploads/bills/1718000000000-3f2a.pdf`.
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a vendor bill attachment under a fresh name.
    pub async fn save_bill(
        &self,
        original_name: &str,
        data: &[u8],
    ) -> Result<StoredFile, std::io::Error> {
        let dir = self.root.join(BILLS_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = generated_name(original_name);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, data).await?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Stored attachment");
        Ok(StoredFile {
            path,
            url: format!("{UPLOADS_PATH}{BILLS_DIR}/{file_name}"),
        })
    }

    /// Remove a file whose database row was never written. Failure is
    /// logged; the caller is already returning an error.
    pub async fn discard(&self, file: &StoredFile) {
        if let Err(err) = tokio::fs::remove_file(&file.path).await {
            tracing::warn!(path = %file.path.display(), error = %err, "Failed to remove orphaned attachment");
        }
    }
}

/// `<unix millis>-<uuid>.<ext>`, keeping a short alphanumeric extension
/// from the client's file name.
fn generated_name(original_name: &str) -> String {
    let stem = format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    );
    match extension_of(original_name) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let valid = !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_sanitised() {
        assert_eq!(extension_of("invoice.PDF"), Some("pdf".into()));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".into()));
        assert_eq!(extension_of("no_extension"), None);
        assert_eq!(extension_of("evil.p/h/p"), None);
    }

    #[tokio::test]
    async fn test_save_then_discard() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());

        let stored = store.save_bill("bill.pdf", b"%PDF-1.4").await.unwrap();
        assert!(stored.url.starts_with("/uploads/bills/"));
        assert!(stored.url.ends_with(".pdf"));
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"%PDF-1.4");

        store.discard(&stored).await;
        assert!(!stored.path.exists());
    }
}
