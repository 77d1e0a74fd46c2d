//! Report export filter and row shape.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::{ComplaintRecord, ComplaintStatus, Error, Visibility};

/// Filter applied to the export query.
///
/// The created-date window only applies when both bounds are given; the
/// bounds are inclusive calendar dates in UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<ComplaintStatus>,
    pub visibility: Option<Visibility>,
}

impl ReportFilter {
    /// Reject an inverted date window.
    pub fn validate(&self) -> Result<(), Error> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(Error::invalid_request(format!(
                "report window starts ({from}) after it ends ({to})"
            ))),
            _ => Ok(()),
        }
    }

    /// Half-open `[start, end)` instant range covering both dates, if set.
    ///
    /// An end date with no successor extends the window to the last
    /// representable instant.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use grievance::domain::ReportFilter;
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 3, 1).expect("date");
    /// let filter = ReportFilter { from: Some(day), to: Some(day), ..ReportFilter::default() };
    /// let (start, end) = filter.created_window().expect("window");
    /// assert_eq!((end - start).num_hours(), 24);
    /// ```
    pub fn created_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (from, to) = self.from.zip(self.to)?;
        let start = from.and_time(NaiveTime::MIN).and_utc();
        let end = to
            .succ_opt()
            .map_or(DateTime::<Utc>::MAX_UTC, |next| next.and_time(NaiveTime::MIN).and_utc());
        Some((start, end))
    }
}

/// One exported complaint, with submitter identity already redacted.
///
/// `user_id` is `None` for anonymous complaints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub username: String,
    pub email: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub visibility: &'static str,
    pub urgency: &'static str,
    pub status: &'static str,
    pub escalated_to: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplaintRecord> for ReportRow {
    fn from(record: ComplaintRecord) -> Self {
        let submitter = record.outward_submitter();
        let complaint = record.complaint;
        let user_id = (complaint.visibility != Visibility::Anonymous)
            .then(|| complaint.submitter_id.get());
        Self {
            id: complaint.id.get(),
            user_id,
            username: submitter.username,
            email: submitter.email,
            title: complaint.title,
            description: complaint.description,
            category: complaint.category.unwrap_or_default(),
            visibility: complaint.visibility.as_str(),
            urgency: complaint.urgency.as_str(),
            status: complaint.status.as_str(),
            escalated_to: complaint.escalated_to.unwrap_or_default(),
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        }
    }
}
