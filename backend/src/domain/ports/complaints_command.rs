//! Driving port for complaint mutations.
//!
//! Each operation takes an explicit request struct carrying the
//! authenticated [`Actor`]. Role checks happen before any mutation.

use async_trait::async_trait;

use crate::domain::{
    Actor, AttachmentToken, Complaint, ComplaintId, ComplaintStatus, ComplaintView, Error,
    ThreadEntry, ThreadOrder, Visibility,
};

/// Request to file a new complaint.
#[derive(Debug, Clone)]
pub struct SubmitComplaintRequest {
    pub actor: Actor,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    /// Defaults to `Public` when absent.
    pub visibility: Option<Visibility>,
    /// Tokens already stored by the upload collaborator, in upload order.
    pub attachments: Vec<AttachmentToken>,
}

/// Request to move a complaint to a new status.
#[derive(Debug, Clone)]
pub struct SetStatusRequest {
    pub actor: Actor,
    pub complaint_id: ComplaintId,
    pub status: ComplaintStatus,
}

/// Request to delete a complaint and everything hanging off it.
#[derive(Debug, Clone)]
pub struct DeleteComplaintRequest {
    pub actor: Actor,
    pub complaint_id: ComplaintId,
}

/// Request to append a staff-only note.
#[derive(Debug, Clone)]
pub struct AddNoteRequest {
    pub actor: Actor,
    pub complaint_id: ComplaintId,
    pub body: String,
}

/// Request to append a reply visible to the submitter.
#[derive(Debug, Clone)]
pub struct AddReplyRequest {
    pub actor: Actor,
    pub complaint_id: ComplaintId,
    pub body: String,
    /// Ordering of the returned reply list.
    pub order: ThreadOrder,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintsCommand: Send + Sync {
    /// File a complaint with its attachments. Submitters only.
    async fn submit(&self, request: SubmitComplaintRequest) -> Result<ComplaintView, Error>;

    /// Change status and bump `updated_at`. Staff only.
    async fn set_status(&self, request: SetStatusRequest) -> Result<Complaint, Error>;

    /// Cascade-delete a complaint. Staff only; missing ids are `NotFound`.
    async fn delete(&self, request: DeleteComplaintRequest) -> Result<(), Error>;

    /// Append a note and return all notes newest-first. Staff only.
    async fn add_note(&self, request: AddNoteRequest) -> Result<Vec<ThreadEntry>, Error>;

    /// Append a reply and return all replies in the requested order.
    async fn add_reply(&self, request: AddReplyRequest) -> Result<Vec<ThreadEntry>, Error>;
}
