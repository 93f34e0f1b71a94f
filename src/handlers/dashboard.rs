use axum::extract::{Query, State};
use axum::response::Json;
use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use crate::date_utils::previous_month;
use crate::db::queries::{daily_facts, member_report};
use crate::db::ReportFilter;
use crate::error::AppResult;
use crate::services::cards::{build_card, KpiCard};
use crate::services::kpi::Kpi;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardKpis {
    #[serde(rename = "depositAmount")]
    pub deposit_amount: Kpi,
    #[serde(rename = "withdrawAmount")]
    pub withdraw_amount: Kpi,
    #[serde(rename = "netProfit")]
    pub net_profit: Kpi,
    #[serde(rename = "activeMembers")]
    pub active_members: Kpi,
    #[serde(rename = "newDepositors")]
    pub new_depositors: Kpi,
    #[serde(rename = "newRegisters")]
    pub new_registers: Kpi,
    #[serde(rename = "netAdjustment")]
    pub net_adjustment: Kpi,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub success: bool,
    pub year: i32,
    pub month: u32,
    pub kpis: DashboardKpis,
    pub cards: Vec<KpiCard>,
}

/// Seven KPI cards for the selected (or current) month, each compared to
/// the previous month. The queries run sequentially on one pooled
/// connection without a wrapping transaction.
pub async fn summary(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<DashboardSummary>> {
    let conn = state.db.get()?;

    let now = chrono::Local::now();
    let year = filter.year.unwrap_or(now.year());
    let month = filter.month.unwrap_or(now.month());
    let (prev_year, prev_month) = previous_month(year, month);

    debug!(year = year, month = month, "Loading dashboard summary");

    let current = member_report::month_totals(&conn, &filter, year, month)?;
    let previous = member_report::month_totals(&conn, &filter, prev_year, prev_month)?;

    let current_facts = month_fact_filter(&filter, year, month);
    let previous_facts = month_fact_filter(&filter, prev_year, prev_month);

    let new_depositors = Kpi::compare(
        daily_facts::new_depositor_count(&conn, &current_facts)?,
        daily_facts::new_depositor_count(&conn, &previous_facts)?,
    );
    let new_registers = Kpi::compare(
        daily_facts::new_register_count(&conn, &current_facts)?,
        daily_facts::new_register_count(&conn, &previous_facts)?,
    );
    let net_adjustment = Kpi::compare(
        daily_facts::adjustment_amount(&conn, &current_facts)?,
        daily_facts::adjustment_amount(&conn, &previous_facts)?,
    );

    let kpis = DashboardKpis {
        deposit_amount: Kpi::compare(current.deposit_amount, previous.deposit_amount),
        withdraw_amount: Kpi::compare(current.withdraw_amount, previous.withdraw_amount),
        net_profit: Kpi::compare(current.net_profit, previous.net_profit),
        active_members: Kpi::compare(
            current.active_members as f64,
            previous.active_members as f64,
        ),
        new_depositors,
        new_registers,
        net_adjustment,
    };

    let cards = vec![
        build_card(
            "Deposit Amount",
            kpis.deposit_amount.value,
            kpis.deposit_amount.change,
            "deposit",
        ),
        build_card(
            "Withdraw Amount",
            kpis.withdraw_amount.value,
            kpis.withdraw_amount.change,
            "withdraw",
        ),
        build_card(
            "Net Profit",
            kpis.net_profit.value,
            kpis.net_profit.change,
            "profit",
        ),
        build_card(
            "Active Members",
            kpis.active_members.value,
            kpis.active_members.change,
            "members",
        ),
        build_card(
            "New Depositors",
            kpis.new_depositors.value,
            kpis.new_depositors.change,
            "new-depositors",
        ),
        build_card(
            "New Registers",
            kpis.new_registers.value,
            kpis.new_registers.change,
            "new-registers",
        ),
        build_card(
            "Net Adjustment",
            kpis.net_adjustment.value,
            kpis.net_adjustment.change,
            "adjustment",
        ),
    ];

    Ok(Json(DashboardSummary {
        success: true,
        year,
        month,
        kpis,
        cards,
    }))
}

fn month_fact_filter(filter: &ReportFilter, year: i32, month: u32) -> ReportFilter {
    ReportFilter {
        currency: filter.currency.clone(),
        line: filter.line.clone(),
        year: Some(year),
        month: Some(month),
        ..Default::default()
    }
}
