use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::date_utils::parse_iso_date;
use crate::db::queries::exchange_rates;
use crate::db::ReportFilter;
use crate::error::{AppError, AppResult};
use crate::models::{ExchangeRate, SaveExchangeRate, UpdateExchangeRate};
use crate::services::export;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExchangeRateResponse {
    pub success: bool,
    pub rows: Vec<ExchangeRate>,
    pub total: usize,
}

pub async fn data(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<ExchangeRateResponse>> {
    let conn = state.db.get()?;
    let rows = exchange_rates::list(&conn, &filter)?;
    let total = rows.len();

    Ok(Json(ExchangeRateResponse {
        success: true,
        rows,
        total,
    }))
}

pub async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveExchangeRate>,
) -> AppResult<Json<serde_json::Value>> {
    let date = payload
        .date
        .as_deref()
        .ok_or_else(|| AppError::Validation("date is required".into()))?;
    let currency = payload
        .currency
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("currency is required".into()))?;
    let rate = payload
        .rate
        .ok_or_else(|| AppError::Validation("rate is required".into()))?;

    if parse_iso_date(date).is_none() {
        return Err(AppError::Validation(format!(
            "date must be YYYY-MM-DD, got '{}'",
            date
        )));
    }
    if rate <= 0.0 {
        return Err(AppError::Validation("rate must be positive".into()));
    }

    let conn = state.db.get()?;
    let uniquekey = exchange_rates::uniquekey(date, currency);

    if exchange_rates::uniquekey_exists(&conn, &uniquekey)? {
        return Err(AppError::Validation(format!(
            "uniquekey '{}' already exists",
            uniquekey
        )));
    }

    let id = exchange_rates::create(&conn, date, currency, rate)?;

    Ok(Json(json!({
        "success": true,
        "id": id,
        "uniquekey": uniquekey,
    })))
}

pub async fn update(
    State(state): State<AppState>,
    Json(payload): Json<UpdateExchangeRate>,
) -> AppResult<Json<serde_json::Value>> {
    let uniquekey = payload
        .uniquekey
        .as_deref()
        .ok_or_else(|| AppError::Validation("uniquekey is required".into()))?;
    let rate = payload
        .rate
        .ok_or_else(|| AppError::Validation("rate is required".into()))?;

    if rate <= 0.0 {
        return Err(AppError::Validation("rate must be positive".into()));
    }

    let conn = state.db.get()?;
    if !exchange_rates::update_rate(&conn, uniquekey, rate)? {
        return Err(AppError::NotFound(format!(
            "exchange rate '{}' not found",
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
    if !exchange_rates::delete_by_uniquekey(&conn, uniquekey)? {
        return Err(AppError::NotFound(format!(
            "exchange rate '{}' not found",
            uniquekey
        )));
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn export(
    State(state): State<AppState>,
    Json(filter): Json<ReportFilter>,
) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;

    let rows = exchange_rates::list(&conn, &filter)?;
    let csv = export::exchange_rates_csv(&rows)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::timestamped_filename("exchange_rates")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
