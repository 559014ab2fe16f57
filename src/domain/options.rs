// Caller supplied options for a panel query
use super::dashboard::TimeWindow;
use super::interval::unit_ms;
use super::variables::substitute;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Time range and variable overrides for one panel query.
///
/// No start means "use the dashboard's own range"; no end means "now".
#[derive(Debug, Clone, Default)]
pub struct PanelQueryOptions {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub variables: HashMap<String, String>,
}

impl PanelQueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_range(mut self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        self.start = Some(start);
        self.end = end;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn apply_variables(&self, template: &str) -> String {
        substitute(template, &self.variables)
    }

    /// `from` of the query request: epoch milliseconds, or the dashboard's own start
    pub fn query_from(&self, window: &TimeWindow) -> String {
        match self.start {
            Some(start) => start.timestamp_millis().to_string(),
            None => window.from.clone(),
        }
    }

    /// `to` of the query request: epoch milliseconds or `"now"`
    pub fn query_to(&self) -> String {
        match self.end {
            Some(end) => end.timestamp_millis().to_string(),
            None => "now".to_string(),
        }
    }

    /// Start of a label values lookup in epoch seconds. Falls back to the dashboard's
    /// relative start, then to the epoch.
    pub fn label_start_secs(&self, window: &TimeWindow, now: DateTime<Utc>) -> i64 {
        self.start
            .or_else(|| resolve_relative(&window.from, now))
            .map_or(0, |start| start.timestamp())
    }

    pub fn label_end_secs(&self) -> Option<i64> {
        self.end.map(|end| end.timestamp())
    }
}

/// Resolves a Grafana time expression (`now`, `now-6h`, `now-7d/d`, epoch millis)
/// against `now`. Rounding suffixes are ignored.
pub fn resolve_relative(expr: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let expr = expr.trim();
    if expr == "now" {
        return Some(now);
    }
    if let Ok(ms) = expr.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms);
    }

    let offset = expr.strip_prefix("now-")?.split('/').next()?;
    let unit = offset.chars().last()?;
    let amount: i64 = offset[..offset.len() - unit.len_utf8()].parse().ok()?;
    let per_unit = match unit {
        'w' => 7 * 86_400_000,
        other => unit_ms(other)?,
    };
    now.checked_sub_signed(Duration::milliseconds(amount.checked_mul(per_unit)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_query_range_defaults() {
        let window = TimeWindow::default();
        let options = PanelQueryOptions::new();
        assert_eq!(options.query_from(&window), "now-6h");
        assert_eq!(options.query_to(), "now");
    }

    #[test]
    fn test_query_range_explicit() {
        let window = TimeWindow::default();
        let options =
            PanelQueryOptions::new().with_time_range(at(1_700_000_000), Some(at(1_700_003_600)));
        assert_eq!(options.query_from(&window), "1700000000000");
        assert_eq!(options.query_to(), "1700003600000");
        assert_eq!(options.label_end_secs(), Some(1_700_003_600));
    }

    #[test]
    fn test_label_start_secs() {
        let now = at(1_700_000_000);
        let window = TimeWindow::default();
        assert_eq!(
            PanelQueryOptions::new().label_start_secs(&window, now),
            1_700_000_000 - 6 * 3600
        );

        let explicit = PanelQueryOptions::new().with_time_range(at(1_600_000_000), None);
        assert_eq!(explicit.label_start_secs(&window, now), 1_600_000_000);
        assert_eq!(explicit.label_end_secs(), None);

        let odd = TimeWindow {
            from: "2024-01-01T00:00:00Z".to_string(),
            to: "now".to_string(),
        };
        assert_eq!(PanelQueryOptions::new().label_start_secs(&odd, now), 0);
    }

    #[test]
    fn test_resolve_relative() {
        let now = at(1_700_000_000);
        assert_eq!(resolve_relative("now", now), Some(now));
        assert_eq!(resolve_relative("now-30m", now), Some(at(1_700_000_000 - 1800)));
        assert_eq!(resolve_relative("now-1w", now), Some(at(1_700_000_000 - 7 * 86_400)));
        assert_eq!(resolve_relative("now-2d/d", now), Some(at(1_700_000_000 - 2 * 86_400)));
        assert_eq!(resolve_relative("1600000000000", now), Some(at(1_600_000_000)));
        assert_eq!(resolve_relative("now-xyz", now), None);
        assert_eq!(resolve_relative("yesterday", now), None);
    }

    #[test]
    fn test_apply_variables() {
        let options = PanelQueryOptions::new().with_variable("job", "api");
        assert_eq!(options.apply_variables("up{job=\"$job\"}"), "up{job=\"api\"}");
    }
}
