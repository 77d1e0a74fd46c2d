//! PostgreSQL-backed `ComplaintRepository`.
//!
//! Reads left-join `users` for the submitter's username and email; a missing
//! user row yields blank identity rather than dropping the complaint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ComplaintRepository, ComplaintRepositoryError};
use crate::domain::{
    Complaint, ComplaintId, ComplaintRecord, ComplaintStatus, NewComplaint, ReportFilter,
    StatusCounts, SubmitterIdentity, Urgency, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ComplaintRow, NewComplaintRow};
use super::pool::{DbPool, PoolError};
use super::schema::{complaint_files, complaints, thread_entries, users};

type RecordRow = (ComplaintRow, Option<String>, Option<String>);

#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(err: PoolError) -> ComplaintRepositoryError {
    map_pool_error(err, ComplaintRepositoryError::connection)
}

fn diesel_error(operation: &'static str) -> impl FnOnce(diesel::result::Error) -> ComplaintRepositoryError {
    move |err| {
        map_diesel_error(
            err,
            operation,
            ComplaintRepositoryError::query,
            ComplaintRepositoryError::connection,
        )
    }
}

fn row_to_complaint(row: ComplaintRow) -> Result<Complaint, ComplaintRepositoryError> {
    let invalid = |err: crate::domain::Error| ComplaintRepositoryError::query(err.message());
    Ok(Complaint {
        id: ComplaintId::new(row.id),
        submitter_id: UserId::new(row.user_id),
        title: row.title,
        description: row.description,
        category: row.category,
        visibility: row.visibility.parse().map_err(invalid)?,
        urgency: row.urgency.parse().map_err(invalid)?,
        status: row.status.parse().map_err(invalid)?,
        escalated_to: row.escalated_to,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_record(
    (row, username, email): RecordRow,
) -> Result<ComplaintRecord, ComplaintRepositoryError> {
    Ok(ComplaintRecord {
        complaint: row_to_complaint(row)?,
        submitter: SubmitterIdentity::new(username.unwrap_or_default(), email.unwrap_or_default()),
    })
}

fn collect_records(rows: Vec<RecordRow>) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError> {
    rows.into_iter().map(row_to_record).collect()
}

macro_rules! record_query {
    () => {
        complaints::table
            .left_join(users::table)
            .select((
                ComplaintRow::as_select(),
                users::username.nullable(),
                users::email.nullable(),
            ))
    };
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn insert(
        &self,
        complaint: &NewComplaint,
        at: DateTime<Utc>,
    ) -> Result<Complaint, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewComplaintRow {
            user_id: complaint.submitter_id().get(),
            title: complaint.title(),
            description: complaint.description(),
            category: complaint.category(),
            visibility: complaint.visibility().as_str(),
            urgency: complaint.urgency().as_str(),
            status: complaint.status().as_str(),
            created_at: at,
            updated_at: at,
        };
        let inserted = diesel::insert_into(complaints::table)
            .values(&row)
            .returning(ComplaintRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error("insert complaint"))?;
        row_to_complaint(inserted)
    }

    async fn find_by_id(
        &self,
        id: ComplaintId,
    ) -> Result<Option<ComplaintRecord>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<RecordRow> = record_query!()
            .filter(complaints::id.eq(id.get()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find complaint"))?;
        row.map(row_to_record).transpose()
    }

    async fn list_all(&self) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<RecordRow> = record_query!()
            .order((complaints::created_at.desc(), complaints::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error("list complaints"))?;
        collect_records(rows)
    }

    async fn list_by_submitter(
        &self,
        submitter: UserId,
    ) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<RecordRow> = record_query!()
            .filter(complaints::user_id.eq(submitter.get()))
            .order((complaints::created_at.desc(), complaints::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error("list own complaints"))?;
        collect_records(rows)
    }

    async fn update_status(
        &self,
        id: ComplaintId,
        status: ComplaintStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(complaints::table.find(id.get()))
            .set((
                complaints::status.eq(status.as_str()),
                complaints::updated_at.eq(at),
            ))
            .returning(ComplaintRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("update status"))?;
        row.map(row_to_complaint).transpose()
    }

    async fn mark_escalated(
        &self,
        id: ComplaintId,
        escalated_to: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(complaints::table.find(id.get()))
            .set((
                complaints::urgency.eq(Urgency::High.as_str()),
                complaints::escalated_to.eq(Some(escalated_to)),
                complaints::updated_at.eq(at),
            ))
            .returning(ComplaintRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("mark escalated"))?;
        row.map(row_to_complaint).transpose()
    }

    async fn delete(&self, id: ComplaintId) -> Result<bool, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let key = id.get();
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(
                        complaint_files::table.filter(complaint_files::complaint_id.eq(key)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(
                        thread_entries::table.filter(thread_entries::complaint_id.eq(key)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(complaints::table.find(key))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error("delete complaint"))?;
        Ok(deleted > 0)
    }

    async fn recent(
        &self,
        submitter: Option<UserId>,
        limit: usize,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        let limit = i64::try_from(limit)
            .map_err(|_| ComplaintRepositoryError::query("recent limit out of range"))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = complaints::table
            .select(ComplaintRow::as_select())
            .into_boxed();
        if let Some(submitter) = submitter {
            query = query.filter(complaints::user_id.eq(submitter.get()));
        }
        let rows: Vec<ComplaintRow> = query
            .order((complaints::created_at.desc(), complaints::id.desc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(diesel_error("list recent complaints"))?;
        rows.into_iter().map(row_to_complaint).collect()
    }

    async fn status_counts(
        &self,
        submitter: Option<UserId>,
    ) -> Result<StatusCounts, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = complaints::table.select(complaints::status).into_boxed();
        if let Some(submitter) = submitter {
            query = query.filter(complaints::user_id.eq(submitter.get()));
        }
        let statuses: Vec<String> = query
            .load(&mut conn)
            .await
            .map_err(diesel_error("count statuses"))?;
        let statuses = statuses
            .iter()
            .map(|raw| {
                raw.parse::<ComplaintStatus>()
                    .map_err(|err| ComplaintRepositoryError::query(err.message()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatusCounts::tally(statuses))
    }

    async fn export(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<ComplaintRecord>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = record_query!().into_boxed();
        if let Some((start, end)) = filter.created_window() {
            query = query.filter(
                complaints::created_at
                    .ge(start)
                    .and(complaints::created_at.lt(end)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(complaints::status.eq(status.as_str()));
        }
        if let Some(visibility) = filter.visibility {
            query = query.filter(complaints::visibility.eq(visibility.as_str()));
        }
        let rows: Vec<RecordRow> = query
            .order((complaints::created_at.desc(), complaints::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error("export complaints"))?;
        collect_records(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Visibility;
    use rstest::{fixture, rstest};

    #[fixture]
    fn row() -> ComplaintRow {
        let now = Utc::now();
        ComplaintRow {
            id: 3,
            user_id: 5,
            title: "Broken AC".into(),
            description: "Room 204".into(),
            category: None,
            visibility: "Anonymous".into(),
            urgency: "High".into(),
            status: "Under Process".into(),
            escalated_to: Some("principal".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn converts_stored_labels(row: ComplaintRow) {
        let complaint = row_to_complaint(row).expect("valid row");
        assert_eq!(complaint.visibility, Visibility::Anonymous);
        assert_eq!(complaint.urgency, Urgency::High);
        assert_eq!(complaint.status, ComplaintStatus::UnderProcess);
    }

    #[rstest]
    fn unknown_status_is_a_query_error(mut row: ComplaintRow) {
        row.status = "Closed".into();
        let err = row_to_complaint(row).expect_err("unknown status");
        assert!(matches!(err, ComplaintRepositoryError::Query { .. }));
    }

    #[rstest]
    fn missing_user_yields_blank_identity(row: ComplaintRow) {
        let record = row_to_record((row, None, None)).expect("valid row");
        assert_eq!(record.submitter, SubmitterIdentity::default());
    }
}
