pub mod charts;
pub mod dashboard;
pub mod exchange_rates;
pub mod headcount;
pub mod member_report;
pub mod slicers;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // Mutating reference-data routes are admin-only.
    let admin_routes = Router::new()
        .route("/api/exchange-rate/save", post(exchange_rates::save))
        .route("/api/exchange-rate/update", put(exchange_rates::update))
        .route("/api/exchange-rate/delete", delete(exchange_rates::remove))
        .route("/api/headcount/save", post(headcount::save))
        .route("/api/headcount/update", put(headcount::update))
        .route("/api/headcount/delete", delete(headcount::remove))
        .layer(middleware::from_fn(auth::require_admin));

    Router::new()
        // Dashboard KPIs and charts
        .route("/api/dashboard/summary", get(dashboard::summary))
        .route("/api/bar-chart-data", get(charts::bar_chart_data))
        .route("/api/line-chart-data", get(charts::line_chart_data))
        // Member report
        .route("/api/member-report/data", get(member_report::data))
        .route("/api/member-report/export", post(member_report::export))
        // Reference data (read side)
        .route("/api/exchange-rate/data", get(exchange_rates::data))
        .route("/api/exchange-rate/export", post(exchange_rates::export))
        .route("/api/headcount/data", get(headcount::data))
        .route("/api/headcount/export", post(headcount::export))
        // Slicer dropdowns
        .route("/api/slicer-options", get(slicers::options))
        .merge(admin_routes)
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
