//! Period-over-period KPI computation.

use serde::Serialize;

/// A KPI value with its change versus the previous period. `change` is
/// `None` when the previous period has no data to compare against, which
/// serializes as JSON `null` rather than `Infinity` or `NaN`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Kpi {
    pub value: f64,
    pub change: Option<f64>,
}

impl Kpi {
    pub fn compare(current: f64, previous: f64) -> Self {
        Self {
            value: current,
            change: percent_change(current, previous),
        }
    }
}

/// `(current - previous) / previous * 100`, undefined for a zero baseline.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}
