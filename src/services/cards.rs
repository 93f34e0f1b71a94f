//! KPI card view-models: a labeled metric, its formatted value, and a
//! period-over-period trend indicator derived from the subtitle text.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub subtitle: String,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn color(&self) -> &'static str {
        match self {
            Trend::Up => "#10b981",
            Trend::Down => "#ef4444",
            Trend::Flat => "#6b7280",
        }
    }
}

fn trend_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([+-])(\d+(?:\.\d+)?)%").expect("valid trend regex"))
}

/// Parse a leading signed percentage (`+12.3% ...` / `-4% ...`) out of a
/// subtitle. Returns the trend direction and the signed magnitude.
pub fn trend_from_subtitle(subtitle: &str) -> Option<(Trend, f64)> {
    let caps = trend_regex().captures(subtitle)?;
    let magnitude: f64 = caps[2].parse().ok()?;

    if magnitude == 0.0 {
        return Some((Trend::Flat, 0.0));
    }
    match &caps[1] {
        "+" => Some((Trend::Up, magnitude)),
        _ => Some((Trend::Down, -magnitude)),
    }
}

/// Format a metric value with thousands separators and two decimals for
/// fractional values.
pub fn format_value(value: f64) -> String {
    let whole = value.trunc() as i64;
    let fractional = (value.fract().abs() * 100.0).round() as i64;

    let formatted = format_with_thousands(whole);
    if fractional > 0 {
        format!("{}.{:02}", formatted, fractional)
    } else {
        formatted
    }
}

fn format_with_thousands(n: i64) -> String {
    let negative = n < 0;
    let digits = n.abs().to_string();

    let mut out = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        out.push('-');
    }
    out.chars().rev().collect()
}

/// Assemble a card from a metric and its nullable period-over-period change.
pub fn build_card(title: &str, value: f64, change: Option<f64>, icon: &str) -> KpiCard {
    let subtitle = match change {
        Some(change) => format!("{:+.2}% vs last month", change),
        None => "no previous period".to_string(),
    };

    let color = trend_from_subtitle(&subtitle)
        .map(|(trend, _)| trend.color())
        .unwrap_or(Trend::Flat.color());

    KpiCard {
        title: title.to_string(),
        value: format_value(value),
        subtitle,
        color: color.to_string(),
        icon: icon.to_string(),
    }
}
