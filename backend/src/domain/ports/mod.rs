//! Domain ports for the hexagonal boundary.
//!
//! Driven ports are implemented by outbound adapters; driving ports are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod attachment_repository;
mod complaint_repository;
mod complaints_command;
mod complaints_query;
mod escalation_command;
mod file_store;
mod mail_transport;
mod thread_repository;
mod user_directory;

#[cfg(test)]
pub use attachment_repository::MockAttachmentRepository;
pub use attachment_repository::{AttachmentRepository, AttachmentRepositoryError};
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_repository::{ComplaintRepository, ComplaintRepositoryError};
#[cfg(test)]
pub use complaints_command::MockComplaintsCommand;
pub use complaints_command::{
    AddNoteRequest, AddReplyRequest, ComplaintsCommand, DeleteComplaintRequest, SetStatusRequest,
    SubmitComplaintRequest,
};
#[cfg(test)]
pub use complaints_query::MockComplaintsQuery;
pub use complaints_query::ComplaintsQuery;
#[cfg(test)]
pub use escalation_command::MockEscalationCommand;
pub use escalation_command::{EscalateRequest, EscalationCommand};
#[cfg(test)]
pub use file_store::MockFileStore;
pub use file_store::{FileStore, FileStoreError};
#[cfg(test)]
pub use mail_transport::MockMailTransport;
pub use mail_transport::{MailTransport, MailTransportError};
#[cfg(test)]
pub use thread_repository::MockThreadRepository;
pub use thread_repository::{ThreadRepository, ThreadRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
