//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; these wrappers register their shape
//! with utoipa from the adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No authenticated actor in the session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The actor's role may not perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The complaint or recipients do not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// Persistence is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    #[schema(example = "complaint 12 not found")]
    message: String,
    #[schema(rename = "traceId", example = "3f2b8c1e-0d4a-4c55-9a3e-6f1d2b7c8e90")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}
