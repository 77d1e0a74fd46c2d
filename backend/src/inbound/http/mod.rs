//! HTTP inbound adapter exposing the complaint REST endpoints.

pub mod admin;
pub mod complaints;
pub mod dto;
pub mod error;
pub mod health;
pub mod reports;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every complaint endpoint.
///
/// Fixed segments such as `/stats` are registered ahead of `/{id}` so they
/// are not captured as identifiers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(complaints::submit_complaint)
        .service(complaints::list_own_complaints)
        .service(complaints::own_stats)
        .service(complaints::own_recent)
        .service(complaints::user_stats)
        .service(complaints::user_recent)
        .service(complaints::track_complaint)
        .service(complaints::list_public_replies)
        .service(admin::summary)
        .service(admin::recent_complaints)
        .service(reports::export_report)
        .service(admin::list_complaints)
        .service(admin::get_complaint)
        .service(admin::delete_complaint)
        .service(admin::set_status)
        .service(admin::list_notes)
        .service(admin::add_note)
        .service(admin::list_replies)
        .service(admin::add_reply)
        .service(admin::escalate);
}
