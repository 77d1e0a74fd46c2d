//! PostgreSQL-backed `ThreadRepository` over the append-only
//! `thread_entries` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ThreadRepository, ThreadRepositoryError};
use crate::domain::{ComplaintId, NewThreadEntry, ThreadEntry, ThreadKind, ThreadOrder, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewThreadEntryRow, ThreadEntryRow};
use super::pool::DbPool;
use super::schema::{thread_entries, users};

#[derive(Clone)]
pub struct DieselThreadRepository {
    pool: DbPool,
}

impl DieselThreadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(operation: &'static str) -> impl FnOnce(diesel::result::Error) -> ThreadRepositoryError {
    move |err| {
        map_diesel_error(
            err,
            operation,
            ThreadRepositoryError::query,
            ThreadRepositoryError::connection,
        )
    }
}

fn parse_kind(raw: &str) -> Result<ThreadKind, ThreadRepositoryError> {
    match raw {
        "note" => Ok(ThreadKind::Note),
        "reply" => Ok(ThreadKind::Reply),
        other => Err(ThreadRepositoryError::query(format!(
            "unknown thread kind '{other}'"
        ))),
    }
}

fn row_to_entry(
    row: ThreadEntryRow,
    author_name: Option<String>,
) -> Result<ThreadEntry, ThreadRepositoryError> {
    Ok(ThreadEntry {
        id: row.id,
        complaint_id: ComplaintId::new(row.complaint_id),
        kind: parse_kind(&row.kind)?,
        author_id: UserId::new(row.author_id),
        author_name,
        body: row.body,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ThreadRepository for DieselThreadRepository {
    async fn append(
        &self,
        entry: &NewThreadEntry,
        at: DateTime<Utc>,
    ) -> Result<ThreadEntry, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ThreadRepositoryError::connection))?;
        let row = diesel::insert_into(thread_entries::table)
            .values(&NewThreadEntryRow {
                complaint_id: entry.complaint_id().get(),
                kind: entry.kind().as_str(),
                author_id: entry.author_id().get(),
                body: entry.body(),
                created_at: at,
            })
            .returning(ThreadEntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error("append thread entry"))?;
        let author_name = users::table
            .find(row.author_id)
            .select(users::username)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("load thread author"))?;
        row_to_entry(row, author_name)
    }

    async fn list(
        &self,
        complaint: ComplaintId,
        kind: ThreadKind,
        order: ThreadOrder,
    ) -> Result<Vec<ThreadEntry>, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ThreadRepositoryError::connection))?;
        let query = thread_entries::table
            .left_join(users::table)
            .filter(thread_entries::complaint_id.eq(complaint.get()))
            .filter(thread_entries::kind.eq(kind.as_str()))
            .select((ThreadEntryRow::as_select(), users::username.nullable()))
            .into_boxed();
        let query = match order {
            ThreadOrder::NewestFirst => {
                query.order((thread_entries::created_at.desc(), thread_entries::id.desc()))
            }
            ThreadOrder::OldestFirst => {
                query.order((thread_entries::created_at.asc(), thread_entries::id.asc()))
            }
        };
        let rows: Vec<(ThreadEntryRow, Option<String>)> = query
            .load(&mut conn)
            .await
            .map_err(diesel_error("list thread entries"))?;
        rows.into_iter()
            .map(|(row, author)| row_to_entry(row, author))
            .collect()
    }
}
