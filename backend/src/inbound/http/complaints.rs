//! Submitter and public complaint endpoints.
//!
//! ```text
//! POST /api/v1/complaints
//! GET  /api/v1/complaints
//! GET  /api/v1/complaints/stats
//! GET  /api/v1/complaints/recent
//! GET  /api/v1/complaints/{id}
//! GET  /api/v1/complaints/{id}/replies
//! GET  /api/v1/users/{id}/complaints/stats
//! GET  /api/v1/users/{id}/complaints/recent
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::ThreadOrder;
use crate::domain::ports::SubmitComplaintRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    ComplaintResponse, RecentComplaintResponse, StatsResponse, SubmitComplaintBody,
    ThreadEntryResponse, ThreadOrderQuery, recent_response, thread_response,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_complaint_id, parse_order, parse_tokens, parse_user_id, parse_visibility, require_text,
};

/// File a new complaint as the logged-in submitter.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = SubmitComplaintBody,
    responses(
        (status = 201, description = "Complaint created", body = ComplaintResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff cannot file complaints", body = ErrorSchema),
        (status = 503, description = "Persistence unavailable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "submitComplaint"
)]
#[post("/api/v1/complaints")]
pub async fn submit_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitComplaintBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let title = require_text(body.title, "title")?;
    let description = require_text(body.description, "description")?;
    let visibility = body
        .visibility
        .as_deref()
        .map(parse_visibility)
        .transpose()?;
    let attachments = parse_tokens(body.attachments.unwrap_or_default())?;

    let view = state
        .complaints
        .submit(SubmitComplaintRequest {
            actor,
            title,
            description,
            category: body.category,
            visibility,
            attachments,
        })
        .await?;
    Ok(HttpResponse::Created().json(ComplaintResponse::from(view)))
}

/// List the caller's own complaints, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    responses(
        (status = 200, description = "Own complaints", body = [ComplaintResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "listOwnComplaints"
)]
#[get("/api/v1/complaints")]
pub async fn list_own_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ComplaintResponse>>> {
    let actor = session.require_actor()?;
    let views = state.complaints_query.list_own(&actor).await?;
    Ok(web::Json(
        views.into_iter().map(ComplaintResponse::from).collect(),
    ))
}

/// Status counts for the caller's own complaints.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/stats",
    responses(
        (status = 200, description = "Own status counts", body = StatsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "ownComplaintStats"
)]
#[get("/api/v1/complaints/stats")]
pub async fn own_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StatsResponse>> {
    let actor = session.require_actor()?;
    let counts = state.complaints_query.own_stats(&actor).await?;
    Ok(web::Json(counts.into()))
}

/// The caller's five newest complaints.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/recent",
    responses(
        (status = 200, description = "Recent complaints", body = [RecentComplaintResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "ownRecentComplaints"
)]
#[get("/api/v1/complaints/recent")]
pub async fn own_recent(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RecentComplaintResponse>>> {
    let actor = session.require_actor()?;
    let recent = state.complaints_query.recent(&actor, Some(actor.id())).await?;
    Ok(web::Json(recent_response(recent)))
}

/// Status counts for one user's complaints. The user themselves or staff.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/complaints/stats",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Status counts", body = StatsResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Another user's complaints", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "userComplaintStats"
)]
#[get("/api/v1/users/{id}/complaints/stats")]
pub async fn user_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<StatsResponse>> {
    let actor = session.require_actor()?;
    let user = parse_user_id(&path)?;
    let counts = state.complaints_query.stats_for(&actor, user).await?;
    Ok(web::Json(counts.into()))
}

/// One user's five newest complaints. The user themselves or staff.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/complaints/recent",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Recent complaints", body = [RecentComplaintResponse]),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Another user's complaints", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "userRecentComplaints"
)]
#[get("/api/v1/users/{id}/complaints/recent")]
pub async fn user_recent(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RecentComplaintResponse>>> {
    let actor = session.require_actor()?;
    let user = parse_user_id(&path)?;
    let recent = state.complaints_query.recent(&actor, Some(user)).await?;
    Ok(web::Json(recent_response(recent)))
}

/// Public tracking view: attachments and replies oldest-first, submitter
/// redacted when anonymous. Internal notes are never included.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}",
    params(("id" = i64, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint", body = ComplaintResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["complaints"],
    security([]),
    operation_id = "trackComplaint"
)]
#[get("/api/v1/complaints/{id}")]
pub async fn track_complaint(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ComplaintResponse>> {
    let id = parse_complaint_id(&path)?;
    let view = state.complaints_query.public_view(id).await?;
    Ok(web::Json(view.into()))
}

/// Public replies on a complaint, oldest first unless `order=newest`.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}/replies",
    params(
        ("id" = i64, Path, description = "Complaint identifier"),
        ThreadOrderQuery
    ),
    responses(
        (status = 200, description = "Replies", body = [ThreadEntryResponse]),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["complaints"],
    security([]),
    operation_id = "listPublicReplies"
)]
#[get("/api/v1/complaints/{id}/replies")]
pub async fn list_public_replies(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ThreadOrderQuery>,
) -> ApiResult<web::Json<Vec<ThreadEntryResponse>>> {
    let id = parse_complaint_id(&path)?;
    let order = parse_order(query.order.as_deref(), ThreadOrder::OldestFirst)?;
    let replies = state.complaints_query.replies(id, order).await?;
    Ok(web::Json(thread_response(replies)))
}

#[cfg(test)]
#[path = "complaints_tests.rs"]
mod tests;
