//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so they can be exercised against mocks without I/O.

use std::sync::Arc;

use crate::domain::ports::{ComplaintsCommand, ComplaintsQuery, EscalationCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub complaints: Arc<dyn ComplaintsCommand>,
    pub complaints_query: Arc<dyn ComplaintsQuery>,
    pub escalations: Arc<dyn EscalationCommand>,
}

impl HttpState {
    pub fn new(
        complaints: Arc<dyn ComplaintsCommand>,
        complaints_query: Arc<dyn ComplaintsQuery>,
        escalations: Arc<dyn EscalationCommand>,
    ) -> Self {
        Self {
            complaints,
            complaints_query,
            escalations,
        }
    }
}
