//! PostgreSQL persistence adapters (diesel-async over a bb8 pool).
//!
//! Row structs and table definitions stay private to this module; the
//! repositories translate them into domain types.

mod diesel_attachment_repository;
mod diesel_complaint_repository;
mod diesel_thread_repository;
mod diesel_user_directory;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_attachment_repository::DieselAttachmentRepository;
pub use diesel_complaint_repository::DieselComplaintRepository;
pub use diesel_thread_repository::DieselThreadRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
