//! Diesel and pool error mapping shared by the repositories.
//!
//! Every repository port error has `Connection` and `Query` variants, so the
//! helpers take the two constructors and pick one.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::error;

use super::pool::PoolError;

pub(crate) fn map_pool_error<E>(err: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = err.into_message();
    error!(%message, "database pool checkout failed");
    connection(message)
}

pub(crate) fn map_diesel_error<E>(
    err: DieselError,
    operation: &'static str,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &err {
        DieselError::DatabaseError(kind, info) => {
            error!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        other => error!(error = %other, operation, "diesel operation failed"),
    }

    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            connection(format!("{operation}: database connection error"))
        }
        DieselError::NotFound => query(format!("{operation}: record not found")),
        _ => query(format!("{operation}: database error")),
    }
}
