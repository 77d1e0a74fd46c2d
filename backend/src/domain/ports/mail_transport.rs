//! Port for delivering escalation mail.
//!
//! Any error returned here is a delivery failure. Callers record it in the
//! escalation outcome; it never aborts the escalation.

use async_trait::async_trait;

use crate::domain::OutboundMail;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transport adapters.
    pub enum MailTransportError {
        /// No transport is configured for this deployment.
        Disabled => "mail transport is not configured",
        /// A sender or recipient address could not be parsed.
        InvalidAddress { address: String, message: String } =>
            "invalid mail address {address}: {message}",
        /// The message could not be assembled.
        Compose { message: String } => "failed to compose mail: {message}",
        /// The relay rejected or dropped the message.
        Delivery { message: String } => "mail delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailTransportError>;
}
