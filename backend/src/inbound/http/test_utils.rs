//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{MockComplaintsCommand, MockComplaintsQuery, MockEscalationCommand};
use crate::domain::{
    Actor, AttachmentToken, Complaint, ComplaintId, ComplaintRecord, ComplaintStatus,
    ComplaintView, Error, Role, SubmitterIdentity, ThreadEntry, ThreadKind, Urgency, UserId,
    Visibility,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Route used by handler tests to log an actor in.
pub const LOGIN_ROUTE: &str = "/test/login/{id}/{username}/{role}";

/// Session middleware with a fresh key and the `Secure` flag off so plain
/// HTTP test requests carry the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

pub async fn login(
    session: SessionContext,
    path: web::Path<(i64, String, String)>,
) -> Result<HttpResponse, Error> {
    let (id, username, role) = path.into_inner();
    session.persist_actor(&Actor::new(UserId::new(id), username, Role::parse(&role)))?;
    Ok(HttpResponse::Ok().finish())
}

/// Handler state over mocks whose expectations are already set.
pub fn state_from_mocks(
    command: MockComplaintsCommand,
    query: MockComplaintsQuery,
    escalation: MockEscalationCommand,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(command),
        Arc::new(query),
        Arc::new(escalation),
    ))
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0)
        .single()
        .expect("valid fixture time")
}

pub fn complaint(id: i64, visibility: Visibility) -> Complaint {
    Complaint {
        id: ComplaintId::new(id),
        submitter_id: UserId::new(5),
        title: "Broken AC".to_owned(),
        description: "Room 204 unit not cooling".to_owned(),
        category: Some("Facilities".to_owned()),
        visibility,
        urgency: Urgency::Normal,
        status: ComplaintStatus::Pending,
        escalated_to: None,
        created_at: at(9),
        updated_at: at(9),
    }
}

/// Redacted view over [`complaint`] with two attachments.
pub fn view(id: i64, visibility: Visibility) -> ComplaintView {
    let record = ComplaintRecord {
        complaint: complaint(id, visibility),
        submitter: SubmitterIdentity::new("asha", "asha@example.edu"),
    };
    let attachments = ["a1.png", "a2.pdf"]
        .into_iter()
        .map(|token| AttachmentToken::new(token).expect("valid token"))
        .collect();
    ComplaintView::new(record, attachments)
}

pub fn entry(id: i64, complaint_id: i64, kind: ThreadKind, body: &str) -> ThreadEntry {
    ThreadEntry {
        id,
        complaint_id: ComplaintId::new(complaint_id),
        kind,
        author_id: UserId::new(9),
        author_name: Some("dr.rao".to_owned()),
        body: body.to_owned(),
        created_at: at(10),
    }
}

/// Initialise the full API with session middleware and the test login route.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::inbound::http::test_utils::test_session_middleware())
                .app_data($state)
                .route(
                    $crate::inbound::http::test_utils::LOGIN_ROUTE,
                    actix_web::web::get().to($crate::inbound::http::test_utils::login),
                )
                .configure($crate::inbound::http::configure),
        )
        .await
    };
}

/// Log in through the test route and return the session cookie.
macro_rules! login_cookie {
    ($app:expr, $path:expr) => {{
        let res = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::get().uri($path).to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&res)
    }};
}

pub(crate) use {init_app, login_cookie};
