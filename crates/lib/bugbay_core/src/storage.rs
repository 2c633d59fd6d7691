//! Byte-storage collaborator.
//!
//! Stores attachment bytes on local disk under opaque uuid filenames. The
//! repository only ever holds the opaque key; nothing here touches report
//! state, and callers must not hold the repository lock across these
//! async calls.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upload constraints enforced before any byte hits disk.
#[derive(Debug, Clone)]
pub struct StoreConstraints {
    pub max_size: u64,
    /// Accepted mimetypes. Empty means accept anything.
    pub allowed_mimetypes: Vec<String>,
}

impl Default for StoreConstraints {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mimetypes: vec![
                "image/png".into(),
                "image/jpeg".into(),
                "image/gif".into(),
                "application/pdf".into(),
                "text/plain".into(),
            ],
        }
    }
}

/// Disk-backed file store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    constraints: StoreConstraints,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, constraints: StoreConstraints) -> Self {
        Self {
            root: root.into(),
            constraints,
        }
    }

    /// Store a byte blob, returning the opaque filename key.
    pub async fn store(&self, bytes: &[u8], mimetype: &str) -> Result<String, StorageError> {
        if bytes.len() as u64 > self.constraints.max_size {
            return Err(StorageError::Validation(format!(
                "file exceeds maximum size of {} bytes",
                self.constraints.max_size
            )));
        }
        if !self.constraints.allowed_mimetypes.is_empty()
            && !self
                .constraints
                .allowed_mimetypes
                .iter()
                .any(|m| m == mimetype)
        {
            return Err(StorageError::Validation(format!(
                "mimetype '{mimetype}' is not allowed"
            )));
        }

        tokio::fs::create_dir_all(&self.root).await?;
        let filename = Uuid::new_v4().to_string();
        tokio::fs::write(self.root.join(&filename), bytes).await?;
        Ok(filename)
    }

    /// Read a stored blob back by its opaque key.
    pub async fn retrieve(&self, filename: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(filename)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("file {filename}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored blob (upload rollback, report deletion). Deleting
    /// an already-absent file succeeds.
    pub async fn delete(&self, filename: &str) -> Result<(), StorageError> {
        let path = self.resolve(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Map an opaque key to a path under the root. Keys must be bare
    /// uuids, which rules out path traversal.
    fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if Uuid::parse_str(filename).is_err() {
            return Err(StorageError::NotFound(format!("file {filename}")));
        }
        Ok(self.root.join(filename))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
