// Grafana API trait - the collaborator every use case talks to
use crate::domain::dashboard::{DashboardResponse, DashboardSearch};
use crate::domain::datasource::Datasource;
use crate::domain::error::Result;
use crate::domain::query::{LabelValuesRequest, QueryRequest};
use crate::domain::results::Results;
use async_trait::async_trait;

#[async_trait]
pub trait GrafanaApi: Send + Sync {
    /// Fetch a dashboard by uid
    async fn get_dashboard(&self, uid: &str) -> Result<DashboardResponse>;

    /// List every configured datasource
    async fn list_datasources(&self) -> Result<Vec<Datasource>>;

    /// Run a query envelope and decode the data frames
    async fn query(&self, request: &QueryRequest) -> Result<Results>;

    /// Values of a label, scoped by a series selector, through a datasource proxy
    async fn label_values(&self, request: &LabelValuesRequest) -> Result<Vec<String>>;

    /// List dashboards
    async fn search_dashboards(&self) -> Result<Vec<DashboardSearch>>;
}
