use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Descriptor for a stored upload. `path` is the public download path the
/// client sees; `filename` is the on-disk name inside the uploads dir.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub filename: String,
    pub path: String,
}

/// Document storage handles writing and reading appointment attachments
#[derive(Clone)]
pub struct DocumentStore {
    base_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    /// Store an upload under a unique name derived from the original
    /// filename. The original name is sanitized; the UUID prefix avoids
    /// collisions between identically-named uploads.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredDocument> {
        fs::create_dir_all(&self.base_dir)
            .await
            .context("Failed to create uploads directory")?;

        let filename = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
        fs::write(self.file_path(&filename), bytes)
            .await
            .with_context(|| format!("Failed to write document {}", filename))?;

        Ok(StoredDocument {
            path: format!("/uploads/{}", filename),
            filename,
        })
    }

    /// Read a stored document. Returns None when the backing file is gone;
    /// any other I/O failure is an error.
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.file_path(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read document {}", filename)),
        }
    }
}

/// Keep alphanumerics plus `.`, `-`, `_`; everything else (including path
/// separators) becomes `_`.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("blood test (1).png"), "blood_test__1_.png");
        assert_eq!(sanitize_filename(""), "document");
    }

    #[tokio::test]
    async fn test_save_and_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());

        let stored = store.save("report.pdf", b"pdf-bytes").await.unwrap();
        assert!(stored.filename.ends_with("_report.pdf"));
        assert_eq!(stored.path, format!("/uploads/{}", stored.filename));

        let bytes = store.read(&stored.filename).await.unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"pdf-bytes"[..]));
    }

    #[tokio::test]
    async fn test_identical_names_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());

        let first = store.save("scan.png", b"one").await.unwrap();
        let second = store.save("scan.png", b"two").await.unwrap();
        assert_ne!(first.filename, second.filename);

        assert_eq!(store.read(&first.filename).await.unwrap().unwrap(), b"one");
        assert_eq!(store.read(&second.filename).await.unwrap().unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_read_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        let result = store.read("gone.pdf").await.unwrap();
        assert!(result.is_none());
    }
}
