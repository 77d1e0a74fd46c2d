//! Uploads directory adapter for the [`FileStore`] port.
//!
//! Reads go through a capability handle on the uploads directory, so a
//! token can only ever name a file beneath it. Missing files and paths that
//! would leave the directory both resolve to `None`.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::AttachmentToken;
use crate::domain::ports::{FileStore, FileStoreError};

/// [`FileStore`] backed by a `cap_std` directory handle.
#[derive(Clone)]
pub struct CapStdFileStore {
    dir: Arc<Dir>,
}

impl CapStdFileStore {
    /// Open the uploads directory at `root`.
    ///
    /// # Errors
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = Dir::open_ambient_dir(root.as_ref(), ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

#[async_trait]
impl FileStore for CapStdFileStore {
    async fn resolve(&self, token: &AttachmentToken) -> Result<Option<Vec<u8>>, FileStoreError> {
        let dir = Arc::clone(&self.dir);
        let name = token.as_str().to_owned();
        let read = tokio::task::spawn_blocking(move || dir.read(name))
            .await
            .map_err(|err| FileStoreError::read(token.as_str(), err.to_string()))?;
        match read {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                debug!(token = %token, error = %err, "stored file unavailable");
                Ok(None)
            }
            Err(err) => Err(FileStoreError::read(token.as_str(), err.to_string())),
        }
    }
}
