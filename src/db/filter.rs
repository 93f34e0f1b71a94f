use rusqlite::ToSql;
use serde::Deserialize;

use crate::date_utils;

/// The two period-filtering modes shared by every report endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Month,
    DateRange,
}

impl FilterMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "month" => Some(FilterMode::Month),
            "daterange" => Some(FilterMode::DateRange),
            _ => None,
        }
    }
}

/// Optional filters as they arrive from the query string or a JSON body.
/// `currency`/`line` equal to `"ALL"` mean "no constraint". One of these is
/// shared by every report query and its paired export, so filter semantics
/// cannot drift between routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub currency: Option<String>,
    pub line: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(alias = "filterMode")]
    pub filter_mode: Option<String>,
}

const ALL: &str = "ALL";

fn constrained(value: &Option<String>) -> Option<&str> {
    match value.as_deref() {
        None | Some(ALL) => None,
        Some(v) => Some(v),
    }
}

impl ReportFilter {
    /// Resolve which period predicate applies. An explicit `filter_mode`
    /// always wins; otherwise month parameters take precedence over a date
    /// range. At most one mode is ever returned.
    pub fn resolve_mode(&self) -> Option<FilterMode> {
        if let Some(mode) = self.filter_mode.as_deref().and_then(FilterMode::parse) {
            return Some(mode);
        }
        if self.year.is_some() {
            return Some(FilterMode::Month);
        }
        if self.start_date.is_some() && self.end_date.is_some() {
            return Some(FilterMode::DateRange);
        }
        None
    }

    /// Append `AND ...` predicates for a date-keyed table. Values travel as
    /// positional parameters; the column names live in the caller's SQL.
    pub fn push_where_sql(&self, sql: &mut String, params: &mut Vec<Box<dyn ToSql>>) {
        self.push_dimension_sql(sql, params);

        match self.resolve_mode() {
            Some(FilterMode::Month) => {
                if let Some(year) = self.year {
                    if let Some((start, end)) = date_utils::period_bounds(year, self.month) {
                        sql.push_str(" AND date >= ? AND date < ?");
                        params.push(Box::new(start));
                        params.push(Box::new(end));
                    }
                }
            }
            Some(FilterMode::DateRange) => {
                if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
                    sql.push_str(" AND date >= ? AND date <= ?");
                    params.push(Box::new(start.clone()));
                    params.push(Box::new(end.clone()));
                }
            }
            None => {}
        }
    }

    /// Append `AND ...` predicates for a (year, month)-keyed table. Date
    /// ranges do not apply to monthly snapshots; only the month mode emits
    /// period predicates here.
    pub fn push_month_where_sql(&self, sql: &mut String, params: &mut Vec<Box<dyn ToSql>>) {
        self.push_dimension_sql(sql, params);

        if let Some(year) = self.year {
            sql.push_str(" AND year = ?");
            params.push(Box::new(year));
        }
        if let Some(month) = self.month {
            sql.push_str(" AND month = ?");
            params.push(Box::new(month));
        }
    }

    fn push_dimension_sql(&self, sql: &mut String, params: &mut Vec<Box<dyn ToSql>>) {
        if let Some(currency) = constrained(&self.currency) {
            sql.push_str(" AND currency = ?");
            params.push(Box::new(currency.to_string()));
        }
        if let Some(line) = constrained(&self.line) {
            sql.push_str(" AND line = ?");
            params.push(Box::new(line.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(filter: &ReportFilter) -> (String, usize) {
        let mut sql = String::from("WHERE 1=1");
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();
        filter.push_where_sql(&mut sql, &mut params);
        (sql, params.len())
    }

    #[test]
    fn test_all_currency_omits_predicate() {
        let filter = ReportFilter {
            currency: Some("ALL".into()),
            ..Default::default()
        };
        let (sql, count) = built(&filter);
        assert!(!sql.contains("currency"));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_specific_currency_parameterized() {
        let filter = ReportFilter {
            currency: Some("MYR".into()),
            line: Some("ALL".into()),
            ..Default::default()
        };
        let (sql, count) = built(&filter);
        assert!(sql.contains("currency = ?"));
        assert!(!sql.contains("line"));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_month_mode_uses_half_open_bounds() {
        let filter = ReportFilter {
            year: Some(2024),
            month: Some(3),
            ..Default::default()
        };
        let (sql, count) = built(&filter);
        assert!(sql.contains("date >= ? AND date < ?"));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_daterange_mode_inclusive() {
        let filter = ReportFilter {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            ..Default::default()
        };
        assert_eq!(filter.resolve_mode(), Some(FilterMode::DateRange));
        let (sql, count) = built(&filter);
        assert!(sql.contains("date >= ? AND date <= ?"));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_month_wins_when_both_supplied() {
        let filter = ReportFilter {
            year: Some(2024),
            month: Some(2),
            start_date: Some("2024-06-01".into()),
            end_date: Some("2024-06-30".into()),
            ..Default::default()
        };
        assert_eq!(filter.resolve_mode(), Some(FilterMode::Month));
        let (sql, count) = built(&filter);
        // Exactly one period predicate: the half-open month bounds.
        assert!(sql.contains("date >= ? AND date < ?"));
        assert!(!sql.contains("date <= ?"));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_explicit_mode_overrides_inference() {
        let filter = ReportFilter {
            filter_mode: Some("daterange".into()),
            year: Some(2024),
            start_date: Some("2024-06-01".into()),
            end_date: Some("2024-06-30".into()),
            ..Default::default()
        };
        assert_eq!(filter.resolve_mode(), Some(FilterMode::DateRange));
        let (sql, _) = built(&filter);
        assert!(sql.contains("date <= ?"));
    }

    #[test]
    fn test_no_filters_no_predicates() {
        let (sql, count) = built(&ReportFilter::default());
        assert_eq!(sql, "WHERE 1=1");
        assert_eq!(count, 0);
    }
}
