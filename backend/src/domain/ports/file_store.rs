//! Port for resolving stored attachment tokens to bytes.

use async_trait::async_trait;

use crate::domain::AttachmentToken;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading a stored file.
    pub enum FileStoreError {
        /// The file exists but could not be read.
        Read { token: String, message: String } =>
            "failed to read stored file {token}: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Bytes for `token`, or `None` when the file no longer exists.
    async fn resolve(&self, token: &AttachmentToken) -> Result<Option<Vec<u8>>, FileStoreError>;
}
