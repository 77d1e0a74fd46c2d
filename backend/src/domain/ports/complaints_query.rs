//! Driving port for complaint reads, dashboards, and exports.

use async_trait::async_trait;

use crate::domain::{
    Actor, Complaint, ComplaintId, ComplaintView, Error, ReportFilter, ReportRow, StatusCounts,
    ThreadEntry, ThreadOrder, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintsQuery: Send + Sync {
    /// Full view for staff: attachments, replies and notes newest-first.
    async fn staff_view(&self, actor: &Actor, id: ComplaintId) -> Result<ComplaintView, Error>;

    /// Tracking view: attachments and replies oldest-first, no notes.
    async fn public_view(&self, id: ComplaintId) -> Result<ComplaintView, Error>;

    /// Every complaint, newest-first. Staff only.
    async fn list_all(&self, actor: &Actor) -> Result<Vec<ComplaintView>, Error>;

    /// The actor's own complaints, newest-first.
    async fn list_own(&self, actor: &Actor) -> Result<Vec<ComplaintView>, Error>;

    /// Notes newest-first. Staff only.
    async fn notes(&self, actor: &Actor, id: ComplaintId) -> Result<Vec<ThreadEntry>, Error>;

    async fn replies(&self, id: ComplaintId, order: ThreadOrder)
    -> Result<Vec<ThreadEntry>, Error>;

    /// Counts across all complaints. Staff only.
    async fn summary(&self, actor: &Actor) -> Result<StatusCounts, Error>;

    /// Counts across the actor's own complaints.
    async fn own_stats(&self, actor: &Actor) -> Result<StatusCounts, Error>;

    /// Counts for one user's complaints. The user themselves or staff.
    async fn stats_for(&self, actor: &Actor, user: UserId) -> Result<StatusCounts, Error>;

    /// The newest [`RECENT_LIMIT`](crate::domain::RECENT_LIMIT) complaints.
    ///
    /// `None` covers every complaint and is staff only; `Some(user)` is
    /// limited to that user's complaints and open to the user or staff.
    async fn recent(&self, actor: &Actor, submitter: Option<UserId>)
    -> Result<Vec<Complaint>, Error>;

    /// Redacted report rows. Staff only; an empty result is `NotFound`.
    async fn export(&self, actor: &Actor, filter: &ReportFilter) -> Result<Vec<ReportRow>, Error>;
}
