// Panel query service - Use case for fetching the data behind a dashboard panel
use crate::application::datasource_resolver::DatasourceResolver;
use crate::application::grafana_api::GrafanaApi;
use crate::application::target_normalizer::TargetNormalizer;
use crate::domain::dashboard::{DashboardResponse, DashboardSearch, PanelSearch};
use crate::domain::error::{GrafanaError, Result};
use crate::domain::options::PanelQueryOptions;
use crate::domain::query::QueryRequest;
use crate::domain::results::Results;
use std::sync::Arc;

#[derive(Clone)]
pub struct PanelQueryService {
    api: Arc<dyn GrafanaApi>,
    resolver: Arc<dyn DatasourceResolver>,
}

impl PanelQueryService {
    pub fn new(api: Arc<dyn GrafanaApi>, resolver: Arc<dyn DatasourceResolver>) -> Self {
        Self { api, resolver }
    }

    pub async fn get_dashboard(&self, uid: &str) -> Result<DashboardResponse> {
        self.api.get_dashboard(uid).await
    }

    pub async fn search_dashboards(&self) -> Result<Vec<DashboardSearch>> {
        self.api.search_dashboards().await
    }

    pub fn panels_of(&self, dashboard: &DashboardResponse) -> Vec<PanelSearch> {
        dashboard.dashboard.panel_summaries()
    }

    pub async fn get_panel_data_from_id(
        &self,
        uid: &str,
        panel_id: i64,
        options: &PanelQueryOptions,
    ) -> Result<Results> {
        let dashboard = self.api.get_dashboard(uid).await?;
        self.get_panel_data(&dashboard, panel_id, options).await
    }

    pub async fn get_panel_data_from_title(
        &self,
        uid: &str,
        title: &str,
        options: &PanelQueryOptions,
    ) -> Result<Results> {
        let dashboard = self.api.get_dashboard(uid).await?;
        self.get_panel_data_by_title(&dashboard, title, options).await
    }

    /// Runs the first panel whose title matches
    pub async fn get_panel_data_by_title(
        &self,
        dashboard: &DashboardResponse,
        title: &str,
        options: &PanelQueryOptions,
    ) -> Result<Results> {
        let panel_id = dashboard
            .dashboard
            .panel_by_title(title)
            .map(|p| p.id)
            .ok_or_else(|| GrafanaError::NotFound(format!("panel titled {:?}", title)))?;

        self.get_panel_data(dashboard, panel_id, options).await
    }

    /// Normalizes the panel's targets, runs them over the requested time range and
    /// attaches the resolved legend templates to the decoded results.
    pub async fn get_panel_data(
        &self,
        dashboard: &DashboardResponse,
        panel_id: i64,
        options: &PanelQueryOptions,
    ) -> Result<Results> {
        let dashboard = &dashboard.dashboard;

        // the fetched dashboard stays untouched; targets are mutated on a copy
        let mut panel = dashboard.panel_by_id(panel_id).cloned().ok_or_else(|| {
            GrafanaError::NotFound(format!("panel {} in dashboard {}", panel_id, dashboard.uid))
        })?;

        tracing::debug!(panel_id, title = %panel.title, targets = panel.targets.len(), "got panel");

        let legends = TargetNormalizer::new(self.resolver.as_ref(), &options.variables)
            .normalize_panel(&mut panel)
            .await?;

        if options.start.is_none() {
            tracing::debug!(
                dashboard = %dashboard.uid,
                from = %dashboard.time.from,
                "using dashboard time range for query"
            );
        }

        let request = QueryRequest {
            from: options.query_from(&dashboard.time),
            to: options.query_to(),
            queries: panel.targets,
        };

        let mut results = self.api.query(&request).await?;
        results.legends = legends;

        tracing::debug!(panel_id, results = results.len(), "got panel data");
        Ok(results)
    }
}
