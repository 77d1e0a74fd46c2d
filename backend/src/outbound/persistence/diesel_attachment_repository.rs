//! PostgreSQL-backed `AttachmentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttachmentRepository, AttachmentRepositoryError};
use crate::domain::{AttachmentToken, ComplaintId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewComplaintFileRow;
use super::pool::DbPool;
use super::schema::complaint_files;

#[derive(Clone)]
pub struct DieselAttachmentRepository {
    pool: DbPool,
}

impl DieselAttachmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> AttachmentRepositoryError {
    move |err| {
        map_diesel_error(
            err,
            operation,
            AttachmentRepositoryError::query,
            AttachmentRepositoryError::connection,
        )
    }
}

fn file_rows(
    complaint: ComplaintId,
    tokens: &[AttachmentToken],
) -> Result<Vec<NewComplaintFileRow<'_>>, AttachmentRepositoryError> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let position = i32::try_from(index)
                .map_err(|_| AttachmentRepositoryError::query("attachment position overflow"))?;
            Ok(NewComplaintFileRow {
                complaint_id: complaint.get(),
                file_token: token.as_str(),
                position,
            })
        })
        .collect()
}

#[async_trait]
impl AttachmentRepository for DieselAttachmentRepository {
    async fn attach(
        &self,
        complaint: ComplaintId,
        tokens: &[AttachmentToken],
    ) -> Result<(), AttachmentRepositoryError> {
        let rows = file_rows(complaint, tokens)?;
        if rows.is_empty() {
            return Ok(());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, AttachmentRepositoryError::connection))?;
        diesel::insert_into(complaint_files::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error("attach files"))
    }

    async fn list_for(
        &self,
        complaint: ComplaintId,
    ) -> Result<Vec<AttachmentToken>, AttachmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, AttachmentRepositoryError::connection))?;
        let tokens: Vec<String> = complaint_files::table
            .filter(complaint_files::complaint_id.eq(complaint.get()))
            .order((complaint_files::position.asc(), complaint_files::id.asc()))
            .select(complaint_files::file_token)
            .load(&mut conn)
            .await
            .map_err(diesel_error("list files"))?;
        tokens
            .into_iter()
            .map(|raw| {
                AttachmentToken::new(raw)
                    .map_err(|err| AttachmentRepositoryError::query(err.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rows_keep_upload_order() {
        let tokens: Vec<AttachmentToken> = ["b.png", "a.png"]
            .into_iter()
            .map(|raw| AttachmentToken::new(raw).expect("valid token"))
            .collect();
        let rows = file_rows(ComplaintId::new(4), &tokens).expect("rows");
        let order: Vec<(&str, i32)> = rows.iter().map(|r| (r.file_token, r.position)).collect();
        assert_eq!(order, vec![("b.png", 0), ("a.png", 1)]);
        assert!(rows.iter().all(|r| r.complaint_id == 4));
    }
}
