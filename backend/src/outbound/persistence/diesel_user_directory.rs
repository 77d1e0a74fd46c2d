//! PostgreSQL-backed `UserDirectory` reading the shared `users` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{Recipient, Role};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::users;

diesel::define_sql_function! {
    fn lower(value: Text) -> Text;
}

#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    /// Role labels are compared case-insensitively.
    async fn find_by_roles(&self, roles: &[Role]) -> Result<Vec<Recipient>, UserDirectoryError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let labels: Vec<String> = roles.iter().map(|role| role.as_str().to_owned()).collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let rows: Vec<(String, String)> = users::table
            .filter(lower(users::role).eq_any(labels))
            .order(users::id.asc())
            .select((users::email, users::role))
            .load(&mut conn)
            .await
            .map_err(|err| {
                map_diesel_error(
                    err,
                    "find users by role",
                    UserDirectoryError::query,
                    UserDirectoryError::connection,
                )
            })?;
        Ok(rows
            .into_iter()
            .map(|(email, role)| Recipient {
                email,
                role: Role::parse(&role),
            })
            .collect())
    }
}
