//! Request parsing helpers shared by the complaint handlers.
//!
//! Every failure is an `invalid_request` carrying the offending field and a
//! stable detail code.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{
    AttachmentToken, ComplaintId, ComplaintStatus, Error, ThreadOrder, UserId, Visibility,
};

/// Detail codes attached to validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetailCode {
    MissingField,
    InvalidId,
    InvalidValue,
    InvalidDate,
}

impl DetailCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidValue => "invalid_value",
            Self::InvalidDate => "invalid_date",
        }
    }
}

fn field_error(field: &str, code: DetailCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field, "value": value, "code": code.as_str() }),
        None => json!({ "field": field, "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        DetailCode::MissingField,
        format!("missing required field: {field}"),
        None,
    )
}

/// Unwrap a required string field, treating blank text as missing.
pub(crate) fn require_text(value: Option<String>, field: &str) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_complaint_id(raw: &str) -> Result<ComplaintId, Error> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(ComplaintId::new)
        .ok_or_else(|| {
            field_error(
                "id",
                DetailCode::InvalidId,
                "complaint id must be a positive integer".to_owned(),
                Some(raw),
            )
        })
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(UserId::new)
        .ok_or_else(|| {
            field_error(
                "userId",
                DetailCode::InvalidId,
                "user id must be a positive integer".to_owned(),
                Some(raw),
            )
        })
}

fn invalid_value(field: &str, raw: &str, error: &Error) -> Error {
    field_error(
        field,
        DetailCode::InvalidValue,
        error.message().to_owned(),
        Some(raw),
    )
}

pub(crate) fn parse_status(raw: &str) -> Result<ComplaintStatus, Error> {
    raw.parse()
        .map_err(|err| invalid_value("status", raw, &err))
}

pub(crate) fn parse_visibility(raw: &str) -> Result<Visibility, Error> {
    raw.parse()
        .map_err(|err| invalid_value("visibility", raw, &err))
}

pub(crate) fn parse_order(raw: Option<&str>, default: ThreadOrder) -> Result<ThreadOrder, Error> {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(value) => match value.as_str() {
            "newest" | "desc" | "newest_first" => Ok(ThreadOrder::NewestFirst),
            "oldest" | "asc" | "oldest_first" => Ok(ThreadOrder::OldestFirst),
            _ => Err(field_error(
                "order",
                DetailCode::InvalidValue,
                "order must be 'newest' or 'oldest'".to_owned(),
                Some(&value),
            )),
        },
    }
}

pub(crate) fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            DetailCode::InvalidDate,
            format!("{field} must be a YYYY-MM-DD date"),
            Some(raw),
        )
    })
}

pub(crate) fn parse_tokens(raw: Vec<String>) -> Result<Vec<AttachmentToken>, Error> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            AttachmentToken::new(value.clone()).map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": "attachments",
                    "index": index,
                    "value": value,
                    "code": DetailCode::InvalidValue.as_str(),
                }))
            })
        })
        .collect()
}
