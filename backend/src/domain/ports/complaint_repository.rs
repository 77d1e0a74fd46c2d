//! Port for complaint record persistence.
//!
//! Adapters own referential cleanup: [`ComplaintRepository::delete`] removes
//! the complaint's attachments and thread entries in the same unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Complaint, ComplaintId, ComplaintRecord, ComplaintStatus, NewComplaint, ReportFilter,
    StatusCounts, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by complaint repository adapters.
    pub enum ComplaintRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "complaint repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "complaint repository query failed: {message}",
    }
}

/// Complaint storage and retrieval.
///
/// Listings are newest-first. Records carry the submitter's raw identity;
/// redaction happens in the domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Insert a new complaint stamped with `at` for both timestamps.
    async fn insert(
        &self,
        complaint: &NewComplaint,
        at: DateTime<Utc>,
    ) -> Result<Complaint, ComplaintRepositoryError>;

    async fn find_by_id(
        &self,
        id: ComplaintId,
    ) -> Result<Option<ComplaintRecord>, ComplaintRepositoryError>;

    async fn list_all(&self) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError>;

    async fn list_by_submitter(
        &self,
        submitter: UserId,
    ) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError>;

    /// Set the status and `updated_at`. Returns `None` when the id is absent.
    async fn update_status(
        &self,
        id: ComplaintId,
        status: ComplaintStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Raise urgency to `High` and record the escalation label.
    ///
    /// Returns `None` when the id is absent.
    async fn mark_escalated(
        &self,
        id: ComplaintId,
        escalated_to: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Delete the complaint with its attachments and thread entries.
    ///
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: ComplaintId) -> Result<bool, ComplaintRepositoryError>;

    /// Up to `limit` complaints, newest-first, optionally for one submitter.
    async fn recent(
        &self,
        submitter: Option<UserId>,
        limit: usize,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError>;

    /// Count complaints per status, optionally for one submitter only.
    async fn status_counts(
        &self,
        submitter: Option<UserId>,
    ) -> Result<StatusCounts, ComplaintRepositoryError>;

    /// Complaints matching `filter`, newest-first.
    async fn export(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError>;
}
