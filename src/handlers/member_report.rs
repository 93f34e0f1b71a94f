use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

use crate::db::queries::member_report;
use crate::db::ReportFilter;
use crate::error::AppResult;
use crate::models::MemberReportDaily;
use crate::services::export;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MemberReportResponse {
    pub success: bool,
    pub rows: Vec<MemberReportDaily>,
    pub total: i64,
}

pub async fn data(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<MemberReportResponse>> {
    let conn = state.db.get()?;

    let rows = member_report::list_daily(&conn, &filter)?;
    let total = member_report::count_daily(&conn, &filter)?;

    Ok(Json(MemberReportResponse {
        success: true,
        rows,
        total,
    }))
}

/// CSV attachment over the exact same query as `data`, so the exported row
/// count always matches the paired endpoint for the same filters.
pub async fn export(
    State(state): State<AppState>,
    Json(filter): Json<ReportFilter>,
) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;

    let rows = member_report::list_daily(&conn, &filter)?;
    let csv = export::member_report_csv(&rows)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::timestamped_filename("member_report")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
