//! Port for the note and reply threads.
//!
//! One store serves both kinds and both orderings. Entries are never updated
//! or removed through this port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ComplaintId, NewThreadEntry, ThreadEntry, ThreadKind, ThreadOrder};

use super::define_port_error;

define_port_error! {
    /// Errors raised by thread repository adapters.
    pub enum ThreadRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "thread repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "thread repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn append(
        &self,
        entry: &NewThreadEntry,
        at: DateTime<Utc>,
    ) -> Result<ThreadEntry, ThreadRepositoryError>;

    /// Entries of `kind` for a complaint. Ties on `created_at` fall back to
    /// insertion order.
    async fn list(
        &self,
        complaint: ComplaintId,
        kind: ThreadKind,
        order: ThreadOrder,
    ) -> Result<Vec<ThreadEntry>, ThreadRepositoryError>;
}
