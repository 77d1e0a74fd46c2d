//! Translation of driven-port failures into domain errors.
//!
//! Connection failures become `service_unavailable`; everything else raised
//! by a store is an `internal_error`. Messages stay descriptive here and are
//! redacted by the HTTP adapter.

use super::Error;
use super::ports::{
    AttachmentRepositoryError, ComplaintRepositoryError, ThreadRepositoryError, UserDirectoryError,
};

pub(crate) fn map_complaint_error(error: ComplaintRepositoryError) -> Error {
    match error {
        ComplaintRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("complaint repository unavailable: {message}"))
        }
        ComplaintRepositoryError::Query { message } => {
            Error::internal(format!("complaint repository error: {message}"))
        }
    }
}

pub(crate) fn map_attachment_error(error: AttachmentRepositoryError) -> Error {
    match error {
        AttachmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("attachment repository unavailable: {message}"))
        }
        AttachmentRepositoryError::Query { message } => {
            Error::internal(format!("attachment repository error: {message}"))
        }
    }
}

pub(crate) fn map_thread_error(error: ThreadRepositoryError) -> Error {
    match error {
        ThreadRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("thread repository unavailable: {message}"))
        }
        ThreadRepositoryError::Query { message } => {
            Error::internal(format!("thread repository error: {message}"))
        }
    }
}

pub(crate) fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}
