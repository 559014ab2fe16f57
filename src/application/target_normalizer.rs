// Target normalizer - prepares a panel's targets for /api/ds/query
use crate::application::datasource_resolver::DatasourceResolver;
use crate::domain::dashboard::Panel;
use crate::domain::error::Result;
use crate::domain::interval::parse_interval_ms;
use crate::domain::target::{DATASOURCE, EXPR, INTERVAL_MS, MAX_DATA_POINTS};
use crate::domain::variables::substitute;
use std::collections::HashMap;

/// Matches the pixel width of a typical dashboard panel, so backend side
/// `$__interval` resolution lines up with what the dashboard UI shows.
pub const DEFAULT_MAX_DATA_POINTS: i64 = 1000;

/// Legend format meaning "let the datasource pick a name"
pub const AUTO_LEGEND: &str = "__auto";

pub struct TargetNormalizer<'a> {
    resolver: &'a dyn DatasourceResolver,
    variables: &'a HashMap<String, String>,
}

impl<'a> TargetNormalizer<'a> {
    pub fn new(
        resolver: &'a dyn DatasourceResolver,
        variables: &'a HashMap<String, String>,
    ) -> Self {
        Self {
            resolver,
            variables,
        }
    }

    /// Normalizes every target of `panel` in place and returns the legend template
    /// of each target, keyed by refId.
    ///
    /// Keys that are already present on a target are never overwritten, so running
    /// this twice leaves the targets unchanged. The default datasource is only looked
    /// up when a target has no datasource and the panel has none either.
    pub async fn normalize_panel(&self, panel: &mut Panel) -> Result<HashMap<String, String>> {
        let panel_id = panel.id;
        let max_data_points = panel.max_data_points.unwrap_or(DEFAULT_MAX_DATA_POINTS);
        let interval_ms = parse_interval_ms(panel.interval());

        let Panel {
            datasource: panel_datasource,
            targets,
            ..
        } = panel;

        let mut legends = HashMap::new();
        for target in targets.iter_mut() {
            if !target.contains(DATASOURCE) {
                if panel_datasource.as_ref().is_none_or(|ds| ds.is_empty()) {
                    tracing::debug!(panel_id, "panel has no datasource, using default datasource");
                    *panel_datasource = Some(self.resolver.resolve_default().await?);
                }
                let datasource = panel_datasource.clone().unwrap_or_default();
                tracing::debug!(
                    panel_id,
                    uid = %datasource.uid,
                    "target has no datasource, using panel datasource"
                );
                target.set(DATASOURCE, datasource.to_reference());
            }

            if let Some(expr) = target.expr() {
                let expr = substitute(expr, self.variables);
                tracing::debug!(panel_id, expr = %expr, "applied variables to target expression");
                target.set(EXPR, expr);
            }

            if let Some(legend) = target.legend_format().filter(|l| *l != AUTO_LEGEND) {
                match target.ref_id() {
                    Some(ref_id) => {
                        legends.insert(ref_id.to_string(), substitute(legend, self.variables));
                    }
                    None => {
                        tracing::warn!(
                            panel_id,
                            legend,
                            "target has no refId, dropping its legend"
                        );
                    }
                }
            }

            target.set_if_absent(MAX_DATA_POINTS, max_data_points);
            if interval_ms > 0 {
                target.set_if_absent(INTERVAL_MS, interval_ms);
            }
        }

        Ok(legends)
    }
}
