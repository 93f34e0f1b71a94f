use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries::slicers;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SlicerParams {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SlicerOptions {
    pub success: bool,
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    pub currencies: Vec<String>,
    pub lines: Vec<String>,
}

/// Option lists for the shared filter dropdowns. `ALL` is prepended to the
/// dimension slicers because it is a valid filter value, not a data value.
pub async fn options(
    State(state): State<AppState>,
    Query(params): Query<SlicerParams>,
) -> AppResult<Json<SlicerOptions>> {
    let conn = state.db.get()?;

    let years = slicers::distinct_years(&conn)?;
    let months = slicers::distinct_months(&conn, params.year)?;

    let mut currencies = vec!["ALL".to_string()];
    currencies.extend(slicers::distinct_currencies(&conn)?);

    let mut lines = vec!["ALL".to_string()];
    lines.extend(slicers::distinct_lines(&conn)?);

    Ok(Json(SlicerOptions {
        success: true,
        years,
        months,
        currencies,
        lines,
    }))
}
