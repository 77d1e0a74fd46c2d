//! Request and response bodies for the complaint endpoints.
//!
//! Request fields are optional at the serde layer so missing values surface
//! as `invalid_request` with field details instead of a bare 400 from the
//! JSON extractor.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Complaint, ComplaintView, EscalationOutcome, NotificationOutcome, StatusCounts,
    SubmitterIdentity, ThreadEntry,
};

/// Body of `POST /api/v1/complaints`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintBody {
    #[schema(example = "Broken AC")]
    pub title: Option<String>,
    #[schema(example = "Room 204 unit not cooling")]
    pub description: Option<String>,
    #[schema(example = "Facilities")]
    pub category: Option<String>,
    /// `Public` (default) or `Anonymous`.
    #[schema(example = "Public")]
    pub visibility: Option<String>,
    /// Stored file tokens from the upload service, in upload order.
    pub attachments: Option<Vec<String>>,
}

/// Body of `PUT /api/v1/admin/complaints/{id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    #[schema(example = "Under Process")]
    pub status: Option<String>,
}

/// Body for appending a note or reply.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadBody {
    #[serde(alias = "note", alias = "message")]
    #[schema(example = "Technician booked for Monday")]
    pub body: Option<String>,
}

/// Body of `POST /api/v1/admin/complaints/{id}/escalate`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EscalateBody {
    /// Role to notify when `notifyAll` is not set.
    #[serde(alias = "targetRole")]
    #[schema(example = "principal")]
    pub higher_authority: Option<String>,
    #[serde(default)]
    pub notify_all: bool,
}

/// Ordering selector for reply listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThreadOrderQuery {
    /// `newest` or `oldest`.
    pub order: Option<String>,
}

/// Query string of the report export.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Inclusive start date, `YYYY-MM-DD`. Applied only together with `to`.
    pub from: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub to: Option<String>,
    pub status: Option<String>,
    pub visibility: Option<String>,
    /// `json` (default) or `csv`.
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitterResponse {
    pub username: String,
    pub email: String,
}

impl From<SubmitterIdentity> for SubmitterResponse {
    fn from(value: SubmitterIdentity) -> Self {
        Self {
            username: value.username,
            email: value.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEntryResponse {
    pub id: i64,
    pub complaint_id: i64,
    /// `note` or `reply`.
    pub kind: String,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub body: String,
    pub created_at: String,
}

impl From<ThreadEntry> for ThreadEntryResponse {
    fn from(entry: ThreadEntry) -> Self {
        Self {
            id: entry.id,
            complaint_id: entry.complaint_id.get(),
            kind: entry.kind.as_str().to_owned(),
            author_id: entry.author_id.get(),
            author_name: entry.author_name,
            body: entry.body,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

pub(crate) fn thread_response(entries: Vec<ThreadEntry>) -> Vec<ThreadEntryResponse> {
    entries.into_iter().map(ThreadEntryResponse::from).collect()
}

/// Complaint as rendered to callers. Submitter fields are blank for
/// anonymous complaints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    #[schema(example = "Public")]
    pub visibility: String,
    #[schema(example = "Normal")]
    pub urgency: String,
    #[schema(example = "Pending")]
    pub status: String,
    pub escalated_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub submitter: SubmitterResponse,
    pub attachments: Vec<String>,
    #[serde(default)]
    pub replies: Vec<ThreadEntryResponse>,
    /// Staff views only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<ThreadEntryResponse>,
}

impl From<ComplaintView> for ComplaintResponse {
    fn from(view: ComplaintView) -> Self {
        let ComplaintView {
            complaint,
            submitter,
            attachments,
            replies,
            notes,
        } = view;
        Self {
            id: complaint.id.get(),
            title: complaint.title,
            description: complaint.description,
            category: complaint.category,
            visibility: complaint.visibility.as_str().to_owned(),
            urgency: complaint.urgency.as_str().to_owned(),
            status: complaint.status.as_str().to_owned(),
            escalated_to: complaint.escalated_to,
            created_at: complaint.created_at.to_rfc3339(),
            updated_at: complaint.updated_at.to_rfc3339(),
            submitter: submitter.into(),
            attachments: attachments.into_iter().map(String::from).collect(),
            replies: thread_response(replies),
            notes: thread_response(notes),
        }
    }
}

/// Result of a status change.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: i64,
    pub status: String,
    pub updated_at: String,
}

impl From<Complaint> for StatusResponse {
    fn from(complaint: Complaint) -> Self {
        Self {
            id: complaint.id.get(),
            status: complaint.status.as_str().to_owned(),
            updated_at: complaint.updated_at.to_rfc3339(),
        }
    }
}

/// Dashboard row for the recent-complaints listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentComplaintResponse {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    #[schema(example = "Pending")]
    pub status: String,
    pub created_at: String,
}

impl From<Complaint> for RecentComplaintResponse {
    fn from(complaint: Complaint) -> Self {
        Self {
            id: complaint.id.get(),
            title: complaint.title,
            category: complaint.category,
            status: complaint.status.as_str().to_owned(),
            created_at: complaint.created_at.to_rfc3339(),
        }
    }
}

pub(crate) fn recent_response(complaints: Vec<Complaint>) -> Vec<RecentComplaintResponse> {
    complaints
        .into_iter()
        .map(RecentComplaintResponse::from)
        .collect()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub pending: u64,
    pub under_process: u64,
    pub resolved: u64,
    pub total: u64,
}

impl From<StatusCounts> for StatsResponse {
    fn from(counts: StatusCounts) -> Self {
        Self {
            pending: counts.pending,
            under_process: counts.under_process,
            resolved: counts.resolved,
            total: counts.total,
        }
    }
}

/// Escalation report. `delivered: false` means the urgency change stands
/// but staff must follow up by hand.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EscalationResponse {
    pub complaint_id: i64,
    #[schema(example = "High")]
    pub urgency: String,
    #[schema(example = "principal")]
    pub escalated_to: String,
    pub recipient_count: usize,
    pub attachments_sent: usize,
    pub attachments_dropped: usize,
    pub delivered: bool,
    pub message: String,
    /// Failure kind, e.g. `delivery_failed` or `mail_disabled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "delivery_failed")]
    pub delivery_error: Option<String>,
}

impl From<EscalationOutcome> for EscalationResponse {
    fn from(outcome: EscalationOutcome) -> Self {
        let (delivered, message, delivery_error) = match outcome.notification {
            NotificationOutcome::Delivered => (
                true,
                "Complaint escalated and emails sent successfully",
                None,
            ),
            NotificationOutcome::Failed { kind } => (
                false,
                "Escalation updated but failed to send emails",
                Some(kind.as_str().to_owned()),
            ),
        };
        Self {
            complaint_id: outcome.complaint_id.get(),
            urgency: outcome.urgency.as_str().to_owned(),
            escalated_to: outcome.escalated_to,
            recipient_count: outcome.recipients.len(),
            attachments_sent: outcome.attachments_sent,
            attachments_dropped: outcome.attachments_dropped,
            delivered,
            message: message.to_owned(),
            delivery_error,
        }
    }
}
