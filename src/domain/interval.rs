// Panel interval parsing ("30s", "5m", ...)

/// Used whenever a configured interval cannot be understood.
pub const DEFAULT_INTERVAL_MS: i64 = 60_000;

/// Milliseconds per unit suffix accepted in panel intervals
pub fn unit_ms(unit: char) -> Option<i64> {
    match unit {
        's' => Some(1_000),
        'm' => Some(60_000),
        'h' => Some(3_600_000),
        'd' => Some(86_400_000),
        _ => None,
    }
}

/// Converts a panel interval such as `"5m"` into milliseconds.
///
/// An empty string means no interval is configured and yields 0. Anything else that
/// does not parse as `<integer><s|m|h|d>` falls back to [`DEFAULT_INTERVAL_MS`] and
/// logs a warning.
pub fn parse_interval_ms(interval: &str) -> i64 {
    if interval.is_empty() {
        return 0;
    }

    match parse_strict(interval) {
        Some(ms) => ms,
        None => {
            tracing::warn!(
                interval,
                fallback_ms = DEFAULT_INTERVAL_MS,
                "could not parse panel interval, using fallback"
            );
            DEFAULT_INTERVAL_MS
        }
    }
}

fn parse_strict(interval: &str) -> Option<i64> {
    let unit = interval.chars().last()?;
    let amount = &interval[..interval.len() - unit.len_utf8()];
    if amount.is_empty() {
        return None;
    }
    let amount: i64 = amount.parse().ok()?;
    amount.checked_mul(unit_ms(unit)?)
}
