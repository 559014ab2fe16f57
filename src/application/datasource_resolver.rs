// Default datasource resolution, fetched once per client
use crate::application::grafana_api::GrafanaApi;
use crate::domain::datasource::Datasource;
use crate::domain::error::{GrafanaError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[async_trait]
pub trait DatasourceResolver: Send + Sync {
    /// The backend-wide default datasource. Empty when none is flagged as default.
    async fn resolve_default(&self) -> Result<Datasource>;
}

/// Lists datasources on first use and keeps the default for the lifetime of the
/// resolver. Concurrent first callers share a single fetch; a failed fetch is not
/// cached.
pub struct CachedDatasourceResolver {
    api: Arc<dyn GrafanaApi>,
    default: OnceCell<Datasource>,
}

impl CachedDatasourceResolver {
    pub fn new(api: Arc<dyn GrafanaApi>) -> Self {
        Self {
            api,
            default: OnceCell::new(),
        }
    }
}

#[async_trait]
impl DatasourceResolver for CachedDatasourceResolver {
    async fn resolve_default(&self) -> Result<Datasource> {
        let datasource = self
            .default
            .get_or_try_init(|| async {
                tracing::debug!("fetching datasources to find the default");
                let datasources = self.api.list_datasources().await?;
                let default = Datasource::find_default(datasources);
                if default.is_empty() {
                    tracing::warn!("no datasource is flagged as default");
                } else {
                    tracing::debug!(
                        uid = %default.uid,
                        kind = %default.kind,
                        "resolved default datasource"
                    );
                }
                Ok::<_, GrafanaError>(default)
            })
            .await?;

        Ok(datasource.clone())
    }
}

/// Keeps an explicitly configured datasource, otherwise falls back to the default
pub async fn datasource_or_default(
    resolver: &dyn DatasourceResolver,
    current: Option<&Datasource>,
) -> Result<Datasource> {
    match current {
        Some(datasource) if !datasource.is_empty() => Ok(datasource.clone()),
        _ => resolver.resolve_default().await,
    }
}
