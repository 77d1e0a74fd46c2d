//! Driving port for escalating a complaint to higher authorities.

use async_trait::async_trait;

use crate::domain::{Actor, ComplaintId, Error, EscalationOutcome};

/// Request to escalate one complaint.
#[derive(Debug, Clone)]
pub struct EscalateRequest {
    pub actor: Actor,
    pub complaint_id: ComplaintId,
    /// Role label to notify; ignored when `notify_all` is set.
    pub target_role: Option<String>,
    pub notify_all: bool,
}

/// Escalation is two-phase. The urgency change is persisted first; delivery
/// runs afterwards and its result is reported in the returned outcome rather
/// than as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EscalationCommand: Send + Sync {
    async fn escalate(&self, request: EscalateRequest) -> Result<EscalationOutcome, Error>;
}
