//! Append-only communication threads on a complaint.
//!
//! Notes are staff-only; replies are visible to the submitter. Both share
//! one shape and one store, distinguished by [`ThreadKind`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ComplaintId, Error, UserId};

/// Which of the two parallel threads an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadKind {
    Note,
    Reply,
}

impl ThreadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Reply => "reply",
        }
    }
}

/// Listing order. Staff read newest-first; submitters read oldest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// A persisted note or reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    pub id: i64,
    pub complaint_id: ComplaintId,
    pub kind: ThreadKind,
    pub author_id: UserId,
    /// Author's username, when the directory still knows them.
    pub author_name: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for appending to a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThreadEntry {
    complaint_id: ComplaintId,
    kind: ThreadKind,
    author_id: UserId,
    body: String,
}

impl NewThreadEntry {
    /// Fails with `invalid_request` when `body` is blank.
    pub fn new(
        complaint_id: ComplaintId,
        kind: ThreadKind,
        author_id: UserId,
        body: &str,
    ) -> Result<Self, Error> {
        let body = body.trim();
        if body.is_empty() {
            return Err(Error::invalid_request(format!(
                "{} text is required",
                kind.as_str()
            )));
        }
        Ok(Self {
            complaint_id,
            kind,
            author_id,
            body: body.to_owned(),
        })
    }

    pub fn complaint_id(&self) -> ComplaintId {
        self.complaint_id
    }

    pub fn kind(&self) -> ThreadKind {
        self.kind
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(ThreadKind::Note, "note text is required")]
    #[case(ThreadKind::Reply, "reply text is required")]
    fn blank_body_is_rejected(#[case] kind: ThreadKind, #[case] message: &str) {
        let err = NewThreadEntry::new(ComplaintId::new(1), kind, UserId::new(2), "  ")
            .expect_err("blank body");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    fn body_is_trimmed() {
        let entry = NewThreadEntry::new(
            ComplaintId::new(1),
            ThreadKind::Reply,
            UserId::new(2),
            "  Technician booked for Monday. ",
        )
        .expect("valid entry");
        assert_eq!(entry.body(), "Technician booked for Monday.");
    }
}
