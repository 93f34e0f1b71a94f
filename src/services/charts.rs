//! Shaping of aggregate rows into the `{categories, series}` payloads the
//! frontend chart widgets consume.

use std::collections::BTreeMap;

use crate::date_utils::month_label;
use crate::db::queries::daily_facts::DailyPoint;
use crate::db::queries::member_report::MonthlyAggregate;
use crate::models::{ChartData, ChartSeries};

/// Single-series monthly chart. Rows arrive grouped per month in calendar
/// order; only months present in the data appear.
pub fn monthly_chart(
    rows: &[MonthlyAggregate],
    name: &str,
    value: impl Fn(&MonthlyAggregate) -> f64,
) -> ChartData {
    let categories = rows.iter().map(|r| month_label(r.month)).collect();
    let data = rows.iter().map(value).collect();

    ChartData::new(
        categories,
        vec![ChartSeries {
            name: name.to_string(),
            data,
        }],
    )
}

/// Retention/churn percentage series derived from consecutive monthly
/// active-member counts. Churn for month m is the relative drop from month
/// m-1, floored at zero; retention is its complement. The first month in
/// range and months with a zero baseline report 0 for both.
pub fn retention_churn_chart(rows: &[MonthlyAggregate]) -> ChartData {
    let by_month: BTreeMap<u32, i64> = rows.iter().map(|r| (r.month, r.active_members)).collect();

    let mut categories = Vec::with_capacity(rows.len());
    let mut retention = Vec::with_capacity(rows.len());
    let mut churn = Vec::with_capacity(rows.len());

    for row in rows {
        categories.push(month_label(row.month));

        let previous_active = row
            .month
            .checked_sub(1)
            .and_then(|m| by_month.get(&m))
            .copied()
            .unwrap_or(0);

        if previous_active > 0 {
            let lost = (previous_active - row.active_members).max(0) as f64;
            let churn_pct = lost / previous_active as f64 * 100.0;
            churn.push(churn_pct);
            retention.push(100.0 - churn_pct);
        } else {
            churn.push(0.0);
            retention.push(0.0);
        }
    }

    ChartData::new(
        categories,
        vec![
            ChartSeries {
                name: "Retention".to_string(),
                data: retention,
            },
            ChartSeries {
                name: "Churn".to_string(),
                data: churn,
            },
        ],
    )
}

/// Merge two date-keyed series into one chart over the union of their dates,
/// ascending, filling absent dates with zero.
pub fn daily_chart(
    first: (&str, &[DailyPoint]),
    second: (&str, &[DailyPoint]),
) -> ChartData {
    let mut merged: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for (date, amount) in first.1 {
        merged.entry(date.clone()).or_default().0 = *amount;
    }
    for (date, amount) in second.1 {
        merged.entry(date.clone()).or_default().1 = *amount;
    }

    let categories: Vec<String> = merged.keys().cloned().collect();
    let first_data: Vec<f64> = merged.values().map(|(a, _)| *a).collect();
    let second_data: Vec<f64> = merged.values().map(|(_, b)| *b).collect();

    ChartData::new(
        categories,
        vec![
            ChartSeries {
                name: first.0.to_string(),
                data: first_data,
            },
            ChartSeries {
                name: second.0.to_string(),
                data: second_data,
            },
        ],
    )
}
