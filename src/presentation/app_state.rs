// Application state for HTTP handlers
use crate::application::datasource_resolver::{CachedDatasourceResolver, DatasourceResolver};
use crate::application::grafana_api::GrafanaApi;
use crate::application::panel_service::PanelQueryService;
use crate::application::variable_service::TemplateVariableService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub panel_service: PanelQueryService,
    pub variable_service: TemplateVariableService,
}

impl AppState {
    /// Both services share one resolver, so the default datasource is fetched once
    pub fn new(api: Arc<dyn GrafanaApi>) -> Self {
        let resolver: Arc<dyn DatasourceResolver> =
            Arc::new(CachedDatasourceResolver::new(api.clone()));

        Self {
            panel_service: PanelQueryService::new(api.clone(), resolver.clone()),
            variable_service: TemplateVariableService::new(api, resolver),
        }
    }
}
