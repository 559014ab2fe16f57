// Dashboard deep links: https://grafana/d/{uid}/{slug}?viewPanel={id}
use reqwest::Url;

/// Base for path-only links such as `/d/{uid}/{slug}?viewPanel={id}`
const RELATIVE_BASE: &str = "http://localhost/";

/// Extracts the dashboard uid and panel id from a Grafana UI link.
///
/// Returns `("", 0)` when the link cannot be parsed, has no uid segment or carries
/// no numeric `viewPanel` parameter.
pub fn extract_args(link: &str) -> (String, i64) {
    let Some(url) = parse_link(link) else {
        return (String::new(), 0);
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();
    let Some(uid) = segments.get(1).filter(|uid| !uid.is_empty()) else {
        return (String::new(), 0);
    };

    let view_panel = url
        .query_pairs()
        .find(|(key, _)| key == "viewPanel")
        .and_then(|(_, value)| value.parse::<i64>().ok());

    match view_panel {
        Some(id) => (uid.to_string(), id),
        None => (String::new(), 0),
    }
}

fn parse_link(link: &str) -> Option<Url> {
    Url::parse(link)
        .or_else(|_| Url::parse(RELATIVE_BASE).and_then(|base| base.join(link)))
        .ok()
}
