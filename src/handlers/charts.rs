use axum::extract::{Query, State};
use axum::response::Json;
use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use crate::db::queries::{daily_facts, member_report};
use crate::db::ReportFilter;
use crate::error::{AppError, AppResult};
use crate::models::ChartData;
use crate::services::charts;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BarChartResponse {
    pub success: bool,
    #[serde(rename = "depositAmountData")]
    pub deposit_amount_data: ChartData,
    #[serde(rename = "withdrawAmountData")]
    pub withdraw_amount_data: ChartData,
    #[serde(rename = "netProfitData")]
    pub net_profit_data: ChartData,
    #[serde(rename = "retentionChurnData")]
    pub retention_churn_data: ChartData,
}

/// Monthly bar charts for one year: deposit and withdraw amounts plus the
/// derived retention/churn percentages.
pub async fn bar_chart_data(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<BarChartResponse>> {
    if filter.year.is_none() {
        return Err(AppError::Validation("year is required".into()));
    }

    // Whole-year view regardless of any month slicer value.
    let year_filter = ReportFilter {
        month: None,
        ..filter.clone()
    };

    let conn = state.db.get()?;
    let rows = member_report::monthly_aggregates(&conn, &year_filter)?;
    debug!(months = rows.len(), "Loaded monthly aggregates for bar chart");

    Ok(Json(BarChartResponse {
        success: true,
        deposit_amount_data: charts::monthly_chart(&rows, "Deposit Amount", |r| {
            r.deposit_amount
        }),
        withdraw_amount_data: charts::monthly_chart(&rows, "Withdraw Amount", |r| {
            r.withdraw_amount
        }),
        net_profit_data: charts::monthly_chart(&rows, "Net Profit", |r| r.net_profit),
        retention_churn_data: charts::retention_churn_chart(&rows),
    }))
}

#[derive(Debug, Serialize)]
pub struct LineChartResponse {
    pub success: bool,
    #[serde(rename = "dailyAmountData")]
    pub daily_amount_data: ChartData,
}

/// Daily deposit/withdraw amount lines for the selected (or current) month.
pub async fn line_chart_data(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<LineChartResponse>> {
    let now = chrono::Local::now();
    let month_filter = ReportFilter {
        year: Some(filter.year.unwrap_or(now.year())),
        month: Some(filter.month.unwrap_or(now.month())),
        start_date: None,
        end_date: None,
        filter_mode: None,
        ..filter
    };

    let conn = state.db.get()?;
    let deposits = daily_facts::deposit_daily_series(&conn, &month_filter)?;
    let withdrawals = daily_facts::withdraw_daily_series(&conn, &month_filter)?;

    Ok(Json(LineChartResponse {
        success: true,
        daily_amount_data: charts::daily_chart(
            ("Deposit Amount", &deposits),
            ("Withdraw Amount", &withdrawals),
        ),
    }))
}
