//! Staff report export.
//!
//! ```text
//! GET /api/v1/admin/reports/export?from&to&status&visibility&format
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, ReportFilter, ReportRow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::ExportQuery;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, parse_status, parse_visibility};

const CSV_FILENAME: &str = "complaints_report.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn parse(raw: Option<&str>) -> Result<Self, Error> {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            None | Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some(other) => Err(Error::invalid_request(format!(
                "unsupported export format '{other}'; expected json or csv"
            ))),
        }
    }
}

fn filter_from_query(query: &ExportQuery) -> Result<ReportFilter, Error> {
    let filter = ReportFilter {
        from: query
            .from
            .as_deref()
            .map(|raw| parse_date(raw, "from"))
            .transpose()?,
        to: query
            .to
            .as_deref()
            .map(|raw| parse_date(raw, "to"))
            .transpose()?,
        status: query.status.as_deref().map(parse_status).transpose()?,
        visibility: query
            .visibility
            .as_deref()
            .map(parse_visibility)
            .transpose()?,
    };
    filter.validate()?;
    Ok(filter)
}

fn render_csv(rows: &[ReportRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| Error::internal(format!("failed to render report row: {err}")))?;
    }
    writer
        .into_inner()
        .map_err(|err| Error::internal(format!("failed to flush report: {err}")))
}

/// Export complaints matching the filter as JSON or CSV, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/reports/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "Report rows (JSON array or CSV attachment)"),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "No complaints found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "exportReport"
)]
#[get("/api/v1/admin/reports/export")]
pub async fn export_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ExportQuery>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let format = ExportFormat::parse(query.format.as_deref())?;
    let filter = filter_from_query(&query)?;
    let rows = state.complaints_query.export(&actor, &filter).await?;

    match format {
        ExportFormat::Json => Ok(HttpResponse::Ok().json(rows)),
        ExportFormat::Csv => {
            let body = render_csv(&rows)?;
            Ok(HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    ContentDisposition {
                        disposition: DispositionType::Attachment,
                        parameters: vec![DispositionParam::Filename(CSV_FILENAME.to_owned())],
                    },
                ))
                .body(body))
        }
    }
}
