// Template variable service - resolves label_values() variables of a dashboard
use crate::application::datasource_resolver::{DatasourceResolver, datasource_or_default};
use crate::application::grafana_api::GrafanaApi;
use crate::domain::dashboard::DashboardResponse;
use crate::domain::error::{GrafanaError, Result};
use crate::domain::options::PanelQueryOptions;
use crate::domain::query::LabelValuesRequest;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

const LABEL_VALUES_PREFIX: &str = "label_values(";

/// A parsed `label_values(metric, label)` call. The metric selector is empty for the
/// single argument form `label_values(label)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelValuesQuery {
    pub metric: String,
    pub label: String,
}

impl LabelValuesQuery {
    /// Splits on commas; the last segment is the label and everything before it
    /// (commas included) is the metric, so selectors like `m{a="1",b="2"}` survive.
    pub fn parse(query: &str) -> Result<Self> {
        let inner = query.strip_prefix(LABEL_VALUES_PREFIX).unwrap_or(query);
        let inner = inner.strip_suffix(')').unwrap_or(inner);

        let (metric, label) = match inner.rsplit_once(',') {
            Some((metric, label)) => (metric.trim(), label.trim()),
            None => ("", inner.trim()),
        };

        if label.is_empty() {
            return Err(GrafanaError::Fetch(format!(
                "invalid label_values query format: {}",
                query
            )));
        }

        Ok(Self {
            metric: metric.to_string(),
            label: label.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct TemplateVariableService {
    api: Arc<dyn GrafanaApi>,
    resolver: Arc<dyn DatasourceResolver>,
}

impl TemplateVariableService {
    pub fn new(api: Arc<dyn GrafanaApi>, resolver: Arc<dyn DatasourceResolver>) -> Self {
        Self { api, resolver }
    }

    /// Resolves every `label_values(...)` query variable of the dashboard, in order.
    ///
    /// Each resolved variable that the caller did not set is added to
    /// `options.variables` as the `|`-joined alternation of its values, so later
    /// variables and panel queries can reference it. Any failed lookup aborts the
    /// whole resolution.
    pub async fn resolve_variables(
        &self,
        dashboard: &DashboardResponse,
        options: &mut PanelQueryOptions,
    ) -> Result<HashMap<String, Vec<String>>> {
        let dashboard = &dashboard.dashboard;
        let mut resolved = HashMap::new();

        for variable in &dashboard.templating.list {
            if !variable.is_query() {
                continue;
            }

            let Some(query) = variable.query_string() else {
                tracing::warn!(
                    variable = %variable.name,
                    payload = %variable.query,
                    "template variable query has an unexpected shape"
                );
                continue;
            };

            if !query.starts_with(LABEL_VALUES_PREFIX) {
                tracing::warn!(
                    variable = %variable.name,
                    query,
                    "unhandled template variable query type"
                );
                continue;
            }

            let datasource =
                datasource_or_default(self.resolver.as_ref(), variable.datasource.as_ref()).await?;

            let parsed = LabelValuesQuery::parse(query)?;
            let request = LabelValuesRequest {
                datasource_uid: datasource.uid,
                label: parsed.label,
                matcher: options.apply_variables(&parsed.metric),
                start: options.label_start_secs(&dashboard.time, Utc::now()),
                end: options.label_end_secs(),
            };

            tracing::debug!(
                variable = %variable.name,
                label = %request.label,
                matcher = %request.matcher,
                "resolving label values"
            );

            let values = self
                .api
                .label_values(&request)
                .await
                .map_err(|source| GrafanaError::Variable {
                    variable: variable.name.clone(),
                    source: Box::new(source),
                })?;

            let unset = options
                .variables
                .get(&variable.name)
                .is_none_or(|value| value.is_empty());
            if unset {
                options
                    .variables
                    .insert(variable.name.clone(), values.join("|"));
            }
            resolved.insert(variable.name.clone(), values);
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::datasource_resolver::CachedDatasourceResolver;
    use crate::application::test_support::FakeGrafanaApi;
    use chrono::DateTime;

    fn service(api: Arc<FakeGrafanaApi>) -> TemplateVariableService {
        let resolver = Arc::new(CachedDatasourceResolver::new(api.clone()));
        TemplateVariableService::new(api, resolver)
    }

    #[test]
    fn test_parse_label_values() {
        let parsed = LabelValuesQuery::parse(r#"label_values(my_metric{a="b"}, le)"#).unwrap();
        assert_eq!(parsed.metric, r#"my_metric{a="b"}"#);
        assert_eq!(parsed.label, "le");

        let commas =
            LabelValuesQuery::parse(r#"label_values(up{job="x",env="y"}, instance)"#).unwrap();
        assert_eq!(commas.metric, r#"up{job="x",env="y"}"#);
        assert_eq!(commas.label, "instance");

        let single = LabelValuesQuery::parse("label_values(job)").unwrap();
        assert_eq!(single.metric, "");
        assert_eq!(single.label, "job");

        assert!(LabelValuesQuery::parse("label_values()").is_err());
        assert!(LabelValuesQuery::parse("label_values(up, )").is_err());
    }

    #[tokio::test]
    async fn test_resolve_variables() {
        let api = Arc::new(FakeGrafanaApi::new());
        let service = service(api.clone());
        let dashboard = api.dashboard.clone();

        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut options = PanelQueryOptions::new().with_time_range(start, None);
        let resolved = service.resolve_variables(&dashboard, &mut options).await.unwrap();

        // interval, query_result() and bare string payload variables are skipped
        assert_eq!(resolved.len(), 2);
        assert!(!resolved.contains_key("region"));
        assert!(!options.variables.contains_key("region"));
        assert_eq!(resolved["job"], vec!["api", "web"]);
        assert_eq!(options.variables["job"], "api|web");
        assert_eq!(options.variables["instance"], "host1:9100|host2:9100");

        let requests = api.label_requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].datasource_uid, "prom-main");
        assert_eq!(requests[0].matcher, "up");
        assert_eq!(requests[0].start, 1_700_000_000);
        assert_eq!(requests[0].end, None);

        // earlier variables feed later ones; no datasource means the default one
        assert_eq!(requests[1].datasource_uid, "prom-default");
        assert_eq!(requests[1].matcher, r#"up{job=~"api|web"}"#);
    }

    #[tokio::test]
    async fn test_caller_values_are_kept() {
        let api = Arc::new(FakeGrafanaApi::new());
        let service = service(api.clone());
        let dashboard = api.dashboard.clone();

        let mut options = PanelQueryOptions::new().with_variable("job", "batch");
        let resolved = service.resolve_variables(&dashboard, &mut options).await.unwrap();

        assert_eq!(resolved["job"], vec!["api", "web"]);
        assert_eq!(options.variables["job"], "batch");

        let requests = api.label_requests.lock().unwrap().clone();
        assert_eq!(requests[1].matcher, r#"up{job=~"batch"}"#);
    }

    #[tokio::test]
    async fn test_one_failure_aborts_all() {
        let mut api = FakeGrafanaApi::new();
        api.label_values.remove("instance");
        let api = Arc::new(api);
        let service = service(api.clone());
        let dashboard = api.dashboard.clone();

        let mut options = PanelQueryOptions::new();
        let err = service
            .resolve_variables(&dashboard, &mut options)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GrafanaError::Variable { ref variable, .. } if variable == "instance"
        ));
        assert!(err.to_string().contains("instance"));
    }

    #[tokio::test]
    async fn test_failure_keeps_underlying_cause() {
        use std::error::Error as _;

        let mut api = FakeGrafanaApi::new();
        api.refuse_label_values = true;
        let api = Arc::new(api);
        let service = service(api.clone());
        let dashboard = api.dashboard.clone();

        let err = service
            .resolve_variables(&dashboard, &mut PanelQueryOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "fetch");
        assert!(err.to_string().contains("variable job"));

        let cause = err
            .source()
            .and_then(|e| e.downcast_ref::<GrafanaError>())
            .unwrap();
        assert_eq!(cause.kind(), "transport");
        assert!(matches!(cause, GrafanaError::Transport(_)));
    }
}
