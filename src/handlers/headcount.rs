use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::queries::headcount;
use crate::error::{AppError, AppResult};
use crate::models::{Headcount, SaveHeadcount, UpdateHeadcount};
use crate::services::export;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HeadcountParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HeadcountResponse {
    pub success: bool,
    pub rows: Vec<Headcount>,
    pub total: usize,
}

pub async fn data(
    State(state): State<AppState>,
    Query(params): Query<HeadcountParams>,
) -> AppResult<Json<HeadcountResponse>> {
    let conn = state.db.get()?;
    let rows = headcount::list(&conn, params.year, params.month)?;
    let total = rows.len();

    Ok(Json(HeadcountResponse {
        success: true,
        rows,
        total,
    }))
}

pub async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveHeadcount>,
) -> AppResult<Json<serde_json::Value>> {
    let year = payload
        .year
        .ok_or_else(|| AppError::Validation("year is required".into()))?;
    let month = payload
        .month
        .ok_or_else(|| AppError::Validation("month is required".into()))?;
    let department = payload
        .department
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation("department is required".into()))?;
    let count = payload
        .headcount
        .ok_or_else(|| AppError::Validation("headcount is required".into()))?;

    if !(1..=12).contains(&month) {
        return Err(AppError::Validation("month must be between 1 and 12".into()));
    }
    if count < 0 {
        return Err(AppError::Validation("headcount cannot be negative".into()));
    }

    let uniquekey = payload
        .uniquekey
        .clone()
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| format!("{}-{}-{}", year, month, department));

    let conn = state.db.get()?;
    if headcount::uniquekey_exists(&conn, &uniquekey)? {
        return Err(AppError::Validation(format!(
            "uniquekey '{}' already exists",
            uniquekey
        )));
    }

    let id = headcount::create(&conn, &uniquekey, year, month, department, count)?;

    Ok(Json(json!({
        "success": true,
        "id": id,
        "uniquekey": uniquekey,
    })))
}

pub async fn update(
    State(state): State<AppState>,
    Json(payload): Json<UpdateHeadcount>,
) -> AppResult<Json<serde_json::Value>> {
    let uniquekey = payload
        .uniquekey
        .as_deref()
        .ok_or_else(|| AppError::Validation("uniquekey is required".into()))?;
    let count = payload
        .headcount
        .ok_or_else(|| AppError::Validation("headcount is required".into()))?;

    if count < 0 {
        return Err(AppError::Validation("headcount cannot be negative".into()));
    }

    let conn = state.db.get()?;
    if !headcount::update_by_uniquekey(&conn, uniquekey, count, payload.department.as_deref())? {
        return Err(AppError::NotFound(format!(
            "headcount '{}' not found",
            uniquekey
        )));
    }

    Ok(Json(json!({ "success": true, "uniquekey": uniquekey })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub uniquekey: Option<String>,
}

pub async fn remove(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> AppResult<Json<serde_json::Value>> {
    let uniquekey = params
        .uniquekey
        .as_deref()
        .ok_or_else(|| AppError::Validation("uniquekey is required".into()))?;

    let conn = state.db.get()?;
    if !headcount::delete_by_uniquekey(&conn, uniquekey)? {
        return Err(AppError::NotFound(format!(
            "headcount '{}' not found",
            uniquekey
        )));
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn export(
    State(state): State<AppState>,
    Json(params): Json<HeadcountParams>,
) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;

    let rows = headcount::list(&conn, params.year, params.month)?;
    let csv = export::headcount_csv(&rows)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::timestamped_filename("headcount")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
