//! Staff complaint management endpoints.
//!
//! Every handler requires a logged-in actor; the domain services reject
//! non-staff roles with `403 Forbidden`.
//!
//! ```text
//! GET    /api/v1/admin/complaints
//! GET    /api/v1/admin/complaints/{id}
//! DELETE /api/v1/admin/complaints/{id}
//! PUT    /api/v1/admin/complaints/{id}/status
//! GET    /api/v1/admin/complaints/{id}/notes
//! POST   /api/v1/admin/complaints/{id}/notes
//! GET    /api/v1/admin/complaints/{id}/replies
//! POST   /api/v1/admin/complaints/{id}/replies
//! POST   /api/v1/admin/complaints/{id}/escalate
//! GET    /api/v1/admin/summary
//! GET    /api/v1/admin/recent-complaints
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ThreadOrder;
use crate::domain::ports::{
    AddNoteRequest, AddReplyRequest, DeleteComplaintRequest, EscalateRequest, SetStatusRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    ComplaintResponse, EscalateBody, EscalationResponse, RecentComplaintResponse, StatsResponse,
    StatusBody, StatusResponse, ThreadBody, ThreadEntryResponse, ThreadOrderQuery, recent_response,
    thread_response,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_complaint_id, parse_order, parse_status, require_text,
};

/// All complaints, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/complaints",
    responses(
        (status = 200, description = "Complaints", body = [ComplaintResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listComplaints"
)]
#[get("/api/v1/admin/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ComplaintResponse>>> {
    let actor = session.require_actor()?;
    let views = state.complaints_query.list_all(&actor).await?;
    Ok(web::Json(
        views.into_iter().map(ComplaintResponse::from).collect(),
    ))
}

/// Staff detail view with attachments, replies, and notes newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/complaints/{id}",
    params(("id" = i64, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint", body = ComplaintResponse),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "getComplaint"
)]
#[get("/api/v1/admin/complaints/{id}")]
pub async fn get_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ComplaintResponse>> {
    let actor = session.require_actor()?;
    let id = parse_complaint_id(&path)?;
    let view = state.complaints_query.staff_view(&actor, id).await?;
    Ok(web::Json(view.into()))
}

/// Delete a complaint with its attachments, notes, and replies.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/complaints/{id}",
    params(("id" = i64, Path, description = "Complaint identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteComplaint"
)]
#[delete("/api/v1/admin/complaints/{id}")]
pub async fn delete_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let complaint_id = parse_complaint_id(&path)?;
    state
        .complaints
        .delete(DeleteComplaintRequest {
            actor,
            complaint_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Move a complaint to another status.
#[utoipa::path(
    put,
    path = "/api/v1/admin/complaints/{id}/status",
    params(("id" = i64, Path, description = "Complaint identifier")),
    request_body = StatusBody,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 400, description = "Invalid status or transition", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "setComplaintStatus"
)]
#[put("/api/v1/admin/complaints/{id}/status")]
pub async fn set_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusBody>,
) -> ApiResult<web::Json<StatusResponse>> {
    let actor = session.require_actor()?;
    let complaint_id = parse_complaint_id(&path)?;
    let raw = require_text(payload.into_inner().status, "status")?;
    let status = parse_status(&raw)?;
    let complaint = state
        .complaints
        .set_status(SetStatusRequest {
            actor,
            complaint_id,
            status,
        })
        .await?;
    Ok(web::Json(complaint.into()))
}

/// Internal notes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/complaints/{id}/notes",
    params(("id" = i64, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Notes", body = [ThreadEntryResponse]),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listNotes"
)]
#[get("/api/v1/admin/complaints/{id}/notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ThreadEntryResponse>>> {
    let actor = session.require_actor()?;
    let id = parse_complaint_id(&path)?;
    let notes = state.complaints_query.notes(&actor, id).await?;
    Ok(web::Json(thread_response(notes)))
}

/// Append an internal note and return the full note list.
#[utoipa::path(
    post,
    path = "/api/v1/admin/complaints/{id}/notes",
    params(("id" = i64, Path, description = "Complaint identifier")),
    request_body = ThreadBody,
    responses(
        (status = 201, description = "Note added", body = [ThreadEntryResponse]),
        (status = 400, description = "Empty note", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "addNote"
)]
#[post("/api/v1/admin/complaints/{id}/notes")]
pub async fn add_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ThreadBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let complaint_id = parse_complaint_id(&path)?;
    let body = require_text(payload.into_inner().body, "body")?;
    let notes = state
        .complaints
        .add_note(AddNoteRequest {
            actor,
            complaint_id,
            body,
        })
        .await?;
    Ok(HttpResponse::Created().json(thread_response(notes)))
}

/// Public replies as staff see them, newest first unless `order=oldest`.
#[utoipa::path(
    get,
    path = "/api/v1/admin/complaints/{id}/replies",
    params(
        ("id" = i64, Path, description = "Complaint identifier"),
        ThreadOrderQuery
    ),
    responses(
        (status = 200, description = "Replies", body = [ThreadEntryResponse]),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listStaffReplies"
)]
#[get("/api/v1/admin/complaints/{id}/replies")]
pub async fn list_replies(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<ThreadOrderQuery>,
) -> ApiResult<web::Json<Vec<ThreadEntryResponse>>> {
    let actor = session.require_actor()?;
    actor.require_staff()?;
    let id = parse_complaint_id(&path)?;
    let order = parse_order(query.order.as_deref(), ThreadOrder::NewestFirst)?;
    let replies = state.complaints_query.replies(id, order).await?;
    Ok(web::Json(thread_response(replies)))
}

/// Post a public reply and return the reply list newest first.
#[utoipa::path(
    post,
    path = "/api/v1/admin/complaints/{id}/replies",
    params(("id" = i64, Path, description = "Complaint identifier")),
    request_body = ThreadBody,
    responses(
        (status = 201, description = "Reply added", body = [ThreadEntryResponse]),
        (status = 400, description = "Empty reply", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "addReply"
)]
#[post("/api/v1/admin/complaints/{id}/replies")]
pub async fn add_reply(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ThreadBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let complaint_id = parse_complaint_id(&path)?;
    let body = require_text(payload.into_inner().body, "body")?;
    let replies = state
        .complaints
        .add_reply(AddReplyRequest {
            actor,
            complaint_id,
            body,
            order: ThreadOrder::NewestFirst,
        })
        .await?;
    Ok(HttpResponse::Created().json(thread_response(replies)))
}

/// Raise urgency to High and notify higher authorities.
///
/// Responds `200 OK` when mail was delivered and `202 Accepted` with
/// `delivered: false` when the urgency change stands but delivery failed.
#[utoipa::path(
    post,
    path = "/api/v1/admin/complaints/{id}/escalate",
    params(("id" = i64, Path, description = "Complaint identifier")),
    request_body = EscalateBody,
    responses(
        (status = 200, description = "Escalated and notified", body = EscalationResponse),
        (status = 202, description = "Escalated, notification failed", body = EscalationResponse),
        (status = 400, description = "No target given", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Complaint or recipients not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "escalateComplaint"
)]
#[post("/api/v1/admin/complaints/{id}/escalate")]
pub async fn escalate(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EscalateBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let complaint_id = parse_complaint_id(&path)?;
    let EscalateBody {
        higher_authority,
        notify_all,
    } = payload.into_inner();
    let outcome = state
        .escalations
        .escalate(EscalateRequest {
            actor,
            complaint_id,
            target_role: higher_authority,
            notify_all,
        })
        .await?;
    let mut response = if outcome.delivered() {
        HttpResponse::Ok()
    } else {
        HttpResponse::Accepted()
    };
    Ok(response.json(EscalationResponse::from(outcome)))
}

/// Dashboard counts across all complaints.
#[utoipa::path(
    get,
    path = "/api/v1/admin/summary",
    responses(
        (status = 200, description = "Status counts", body = StatsResponse),
        (status = 403, description = "Staff only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "complaintSummary"
)]
#[get("/api/v1/admin/summary")]
pub async fn summary(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StatsResponse>> {
    let actor = session.require_actor()?;
    let counts = state.complaints_query.summary(&actor).await?;
    Ok(web::Json(counts.into()))
}

/// The five newest complaints across every submitter.
#[utoipa::path(
    get,
    path = "/api/v1/admin/recent-complaints",
    responses(
        (status = 200, description = "Recent complaints", body = [RecentComplaintResponse]),
        (status = 403, description = "Staff only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "recentComplaints"
)]
#[get("/api/v1/admin/recent-complaints")]
pub async fn recent_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RecentComplaintResponse>>> {
    let actor = session.require_actor()?;
    let recent = state.complaints_query.recent(&actor, None).await?;
    Ok(web::Json(recent_response(recent)))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
