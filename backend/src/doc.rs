//! OpenAPI document for the complaint API.
//!
//! Served through Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::dto::{
    ComplaintResponse, EscalateBody, EscalationResponse, RecentComplaintResponse, StatsResponse,
    StatusBody, StatusResponse, SubmitComplaintBody, SubmitterResponse, ThreadBody,
    ThreadEntryResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the authentication service.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Grievance API",
        description = "Complaint submission, tracking, staff triage, and escalation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::complaints::submit_complaint,
        crate::inbound::http::complaints::list_own_complaints,
        crate::inbound::http::complaints::own_stats,
        crate::inbound::http::complaints::own_recent,
        crate::inbound::http::complaints::user_stats,
        crate::inbound::http::complaints::user_recent,
        crate::inbound::http::complaints::track_complaint,
        crate::inbound::http::complaints::list_public_replies,
        crate::inbound::http::admin::list_complaints,
        crate::inbound::http::admin::get_complaint,
        crate::inbound::http::admin::delete_complaint,
        crate::inbound::http::admin::set_status,
        crate::inbound::http::admin::list_notes,
        crate::inbound::http::admin::add_note,
        crate::inbound::http::admin::list_replies,
        crate::inbound::http::admin::add_reply,
        crate::inbound::http::admin::escalate,
        crate::inbound::http::admin::summary,
        crate::inbound::http::admin::recent_complaints,
        crate::inbound::http::reports::export_report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SubmitComplaintBody,
        StatusBody,
        ThreadBody,
        EscalateBody,
        ComplaintResponse,
        SubmitterResponse,
        ThreadEntryResponse,
        StatusResponse,
        StatsResponse,
        RecentComplaintResponse,
        EscalationResponse,
    )),
    tags(
        (name = "complaints", description = "Submitter and public tracking endpoints"),
        (name = "admin", description = "Staff triage, escalation, and reporting"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
