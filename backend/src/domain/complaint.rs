//! Complaint entity, its enumerated attributes, and outward views.
//!
//! A complaint's submitter reference is always kept internally. What leaves
//! the service is a [`SubmitterIdentity`] that has already been passed through
//! [`SubmitterIdentity::for_visibility`], so anonymous submitters are blank in
//! every rendered representation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attachment::AttachmentToken;
use super::thread::ThreadEntry;
use super::{Error, UserId};

/// Immutable numeric complaint identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(i64);

impl ComplaintId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the submitter's identity may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Anonymous,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Anonymous => "Anonymous",
        }
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "anonymous" => Ok(Self::Anonymous),
            _ => Err(Error::invalid_request(format!("unknown visibility '{s}'"))),
        }
    }
}

/// Coarse priority flag. Only escalation raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Urgency {
    #[default]
    Normal,
    High,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(Error::invalid_request(format!("unknown urgency '{s}'"))),
        }
    }
}

/// Lifecycle state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    #[serde(rename = "Under Process")]
    UnderProcess,
    Resolved,
}

impl ComplaintStatus {
    /// Stored and displayed label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::UnderProcess => "Under Process",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = Error;

    /// Accepts the display label as well as snake and kebab spellings.
    ///
    /// # Examples
    /// ```
    /// use grievance::domain::ComplaintStatus;
    ///
    /// let status: ComplaintStatus = "under_process".parse().expect("known status");
    /// assert_eq!(status, ComplaintStatus::UnderProcess);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();
        match label.as_str() {
            "pending" => Ok(Self::Pending),
            "under process" => Ok(Self::UnderProcess),
            "resolved" => Ok(Self::Resolved),
            _ => Err(Error::invalid_request(format!("unknown status '{s}'"))),
        }
    }
}

/// Persisted complaint attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    pub id: ComplaintId,
    pub submitter_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub visibility: Visibility,
    pub urgency: Urgency,
    pub status: ComplaintStatus,
    pub escalated_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    submitter_id: UserId,
    title: String,
    description: String,
    category: Option<String>,
    visibility: Visibility,
}

impl NewComplaint {
    /// Validate submission fields. Title and description must be non-blank;
    /// a blank category is treated as absent.
    pub fn new(
        submitter_id: UserId,
        title: &str,
        description: &str,
        category: Option<&str>,
        visibility: Option<Visibility>,
    ) -> Result<Self, Error> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() {
            return Err(Error::invalid_request("title is required"));
        }
        if description.is_empty() {
            return Err(Error::invalid_request("description is required"));
        }
        let category = category
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(Self {
            submitter_id,
            title: title.to_owned(),
            description: description.to_owned(),
            category,
            visibility: visibility.unwrap_or_default(),
        })
    }

    pub fn submitter_id(&self) -> UserId {
        self.submitter_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// New complaints always start `Normal` and `Pending`.
    pub fn urgency(&self) -> Urgency {
        Urgency::Normal
    }

    pub fn status(&self) -> ComplaintStatus {
        ComplaintStatus::Pending
    }
}

/// Submitter name and email as joined from the user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterIdentity {
    pub username: String,
    pub email: String,
}

impl SubmitterIdentity {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Blank both fields when the complaint is anonymous.
    ///
    /// # Examples
    /// ```
    /// use grievance::domain::{SubmitterIdentity, Visibility};
    ///
    /// let who = SubmitterIdentity::new("ana", "ana@example.edu");
    /// let shown = who.for_visibility(Visibility::Anonymous);
    /// assert!(shown.username.is_empty() && shown.email.is_empty());
    /// ```
    pub fn for_visibility(self, visibility: Visibility) -> Self {
        match visibility {
            Visibility::Public => self,
            Visibility::Anonymous => Self::default(),
        }
    }
}

/// A complaint together with its submitter's raw identity.
///
/// Internal only; callers outside the domain receive [`ComplaintView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintRecord {
    pub complaint: Complaint,
    pub submitter: SubmitterIdentity,
}

impl ComplaintRecord {
    /// Identity safe to render outward.
    pub fn outward_submitter(&self) -> SubmitterIdentity {
        self.submitter
            .clone()
            .for_visibility(self.complaint.visibility)
    }
}

/// Complaint assembled for a caller, with identity already redacted.
///
/// `notes` is empty for every non-staff view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintView {
    pub complaint: Complaint,
    pub submitter: SubmitterIdentity,
    pub attachments: Vec<AttachmentToken>,
    pub replies: Vec<ThreadEntry>,
    pub notes: Vec<ThreadEntry>,
}

impl ComplaintView {
    pub fn new(record: ComplaintRecord, attachments: Vec<AttachmentToken>) -> Self {
        let submitter = record.outward_submitter();
        Self {
            complaint: record.complaint,
            submitter,
            attachments,
            replies: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_replies(mut self, replies: Vec<ThreadEntry>) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_notes(mut self, notes: Vec<ThreadEntry>) -> Self {
        self.notes = notes;
        self
    }
}

/// Number of complaints shown in dashboard "recent" listings.
pub const RECENT_LIMIT: usize = 5;

/// Per-status complaint counts for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub under_process: u64,
    pub resolved: u64,
    pub total: u64,
}

impl StatusCounts {
    /// Tally a sequence of statuses.
    pub fn tally(statuses: impl IntoIterator<Item = ComplaintStatus>) -> Self {
        statuses
            .into_iter()
            .fold(Self::default(), |mut counts, status| {
                match status {
                    ComplaintStatus::Pending => counts.pending += 1,
                    ComplaintStatus::UnderProcess => counts.under_process += 1,
                    ComplaintStatus::Resolved => counts.resolved += 1,
                }
                counts.total += 1;
                counts
            })
    }
}
