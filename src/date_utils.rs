use chrono::NaiveDate;

/// Roll (year, month) back one month, crossing the year boundary.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Abbreviated English month label ("Jan" .. "Dec") for a 1-based month.
pub fn month_label(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Half-open [start, end) ISO date bounds covering a month, or the whole
/// year when no month is given.
pub fn period_bounds(year: i32, month: Option<u32>) -> Option<(String, String)> {
    match month {
        Some(m) => {
            let start = NaiveDate::from_ymd_opt(year, m, 1)?;
            let (ny, nm) = if m == 12 { (year + 1, 1) } else { (year, m + 1) };
            let end = NaiveDate::from_ymd_opt(ny, nm, 1)?;
            Some((
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string(),
            ))
        }
        None => {
            let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
            Some((
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string(),
            ))
        }
    }
}

/// Validate an incoming `YYYY-MM-DD` string.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
