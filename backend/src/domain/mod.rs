//! Complaint lifecycle domain: entities, ports, and services.
//!
//! Nothing here depends on actix, diesel, or lettre. Inbound adapters call
//! the driving ports in [`ports`]; outbound adapters implement the driven
//! ones.

pub mod actor;
pub mod attachment;
pub mod complaint;
mod complaint_service;
pub mod error;
pub mod escalation;
mod escalation_service;
mod port_errors;
pub mod ports;
pub mod report;
pub mod thread;
mod trace_id;
pub mod transition;

pub use self::actor::{Actor, Role, UserId};
pub use self::attachment::{
    AttachmentToken, AttachmentTokenError, MAX_ATTACHMENTS, ResolvedAttachment,
};
pub use self::complaint::{
    Complaint, ComplaintId, ComplaintRecord, ComplaintStatus, ComplaintView, NewComplaint,
    RECENT_LIMIT, StatusCounts, SubmitterIdentity, Urgency, Visibility,
};
pub use self::complaint_service::ComplaintService;
pub use self::error::{Error, ErrorCode};
pub use self::escalation::{
    DeliveryFailure, ESCALATION_CHAIN, EscalationOutcome, EscalationTarget, MailAttachment,
    NotificationOutcome, OutboundMail, Recipient,
};
pub use self::escalation_service::{EscalationService, NotificationPorts};
pub use self::report::{ReportFilter, ReportRow};
pub use self::thread::{NewThreadEntry, ThreadEntry, ThreadKind, ThreadOrder};
pub use self::trace_id::TraceId;
pub use self::transition::TransitionPolicy;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
