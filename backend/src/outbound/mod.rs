//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories and user directory on Diesel
//! - **files**: the uploads directory, read through `cap_std`
//! - **mail**: escalation notices over SMTP
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business rules.

pub mod files;
pub mod mail;
pub mod persistence;
