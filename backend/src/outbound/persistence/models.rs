//! Internal Diesel row structs. Never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{complaint_files, complaints, thread_entries};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub visibility: String,
    pub urgency: String,
    pub status: String,
    pub escalated_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaints)]
pub(crate) struct NewComplaintRow<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub category: Option<&'a str>,
    pub visibility: &'a str,
    pub urgency: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaint_files)]
pub(crate) struct NewComplaintFileRow<'a> {
    pub complaint_id: i64,
    pub file_token: &'a str,
    pub position: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = thread_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ThreadEntryRow {
    pub id: i64,
    pub complaint_id: i64,
    pub kind: String,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = thread_entries)]
pub(crate) struct NewThreadEntryRow<'a> {
    pub complaint_id: i64,
    pub kind: &'a str,
    pub author_id: i64,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}
