//! Port for the append-only complaint attachment relation.

use async_trait::async_trait;

use crate::domain::{AttachmentToken, ComplaintId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attachment repository adapters.
    pub enum AttachmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attachment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "attachment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Append `tokens` in one batch, preserving their order. An empty slice
    /// is a no-op.
    async fn attach(
        &self,
        complaint: ComplaintId,
        tokens: &[AttachmentToken],
    ) -> Result<(), AttachmentRepositoryError>;

    /// Tokens in insertion order; empty when none exist.
    async fn list_for(
        &self,
        complaint: ComplaintId,
    ) -> Result<Vec<AttachmentToken>, AttachmentRepositoryError>;
}
