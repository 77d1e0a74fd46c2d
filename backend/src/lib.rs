//! Complaint lifecycle and escalation service.
//!
//! [`domain`] holds the entities, ports, and services; [`inbound`] and
//! [`outbound`] hold the actix, diesel, cap-std, and lettre adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
