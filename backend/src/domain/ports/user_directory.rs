//! Port for looking up escalation recipients by role.

use async_trait::async_trait;

use crate::domain::{Recipient, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users whose role label matches any entry of `roles`.
    async fn find_by_roles(&self, roles: &[Role]) -> Result<Vec<Recipient>, UserDirectoryError>;
}
