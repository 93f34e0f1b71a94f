use serde::Serialize;

/// Per-day report snapshot keyed by (date, currency, line).
#[derive(Debug, Clone, Serialize)]
pub struct MemberReportDaily {
    pub id: i64,
    pub date: String,
    pub currency: String,
    pub line: String,
    pub deposit_amount: f64,
    pub deposit_cases: i64,
    pub withdraw_amount: f64,
    pub withdraw_cases: i64,
    pub active_members: i64,
    pub net_profit: f64,
}

/// Per-month report snapshot keyed by (year, month, currency, line).
#[derive(Debug, Clone, Serialize)]
pub struct MemberReportMonthly {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub currency: String,
    pub line: String,
    pub deposit_amount: f64,
    pub deposit_cases: i64,
    pub withdraw_amount: f64,
    pub withdraw_cases: i64,
    pub active_members: i64,
    pub net_profit: f64,
}
