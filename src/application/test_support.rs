// In-memory Grafana API used by the use case tests
use crate::application::grafana_api::GrafanaApi;
use crate::domain::dashboard::{DashboardResponse, DashboardSearch};
use crate::domain::datasource::Datasource;
use crate::domain::error::{GrafanaError, Result};
use crate::domain::query::{LabelValuesRequest, QueryRequest};
use crate::domain::results::Results;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn dashboard_fixture() -> DashboardResponse {
    serde_json::from_str(include_str!("../../testdata/dashboard.json")).unwrap()
}

pub fn results_fixture() -> Results {
    serde_json::from_str(include_str!("../../testdata/data.json")).unwrap()
}

pub fn datasources_fixture() -> Vec<Datasource> {
    serde_json::from_str(include_str!("../../testdata/datasources.json")).unwrap()
}

pub struct FakeGrafanaApi {
    pub dashboard: DashboardResponse,
    pub datasources: Vec<Datasource>,
    pub fail_datasources: bool,
    /// Fail every label values lookup as if the connection was refused
    pub refuse_label_values: bool,
    pub results: Results,
    /// label name -> values
    pub label_values: HashMap<String, Vec<String>>,
    pub datasource_calls: AtomicUsize,
    pub queries: Mutex<Vec<QueryRequest>>,
    pub label_requests: Mutex<Vec<LabelValuesRequest>>,
}

impl FakeGrafanaApi {
    pub fn new() -> Self {
        let mut label_values = HashMap::new();
        label_values.insert("job".to_string(), vec!["api".to_string(), "web".to_string()]);
        label_values.insert(
            "instance".to_string(),
            vec!["host1:9100".to_string(), "host2:9100".to_string()],
        );

        Self {
            dashboard: dashboard_fixture(),
            datasources: datasources_fixture(),
            fail_datasources: false,
            refuse_label_values: false,
            results: results_fixture(),
            label_values,
            datasource_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            label_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn datasource_calls(&self) -> usize {
        self.datasource_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> QueryRequest {
        self.queries.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl GrafanaApi for FakeGrafanaApi {
    async fn get_dashboard(&self, uid: &str) -> Result<DashboardResponse> {
        if uid == self.dashboard.dashboard.uid {
            Ok(self.dashboard.clone())
        } else {
            Err(GrafanaError::Backend {
                status: 404,
                body: "{\"message\":\"Dashboard not found\"}".to_string(),
            })
        }
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        self.datasource_calls.fetch_add(1, Ordering::SeqCst);
        // give concurrent callers a chance to pile up on the first fetch
        tokio::task::yield_now().await;
        if self.fail_datasources {
            return Err(GrafanaError::Backend {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.datasources.clone())
    }

    async fn query(&self, request: &QueryRequest) -> Result<Results> {
        self.queries.lock().unwrap().push(request.clone());
        Ok(self.results.clone())
    }

    async fn label_values(&self, request: &LabelValuesRequest) -> Result<Vec<String>> {
        self.label_requests.lock().unwrap().push(request.clone());
        if self.refuse_label_values {
            return Err(GrafanaError::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        self.label_values
            .get(&request.label)
            .cloned()
            .ok_or_else(|| GrafanaError::Fetch("grafana API returned status: error".to_string()))
    }

    async fn search_dashboards(&self) -> Result<Vec<DashboardSearch>> {
        Ok(serde_json::from_str(include_str!("../../testdata/search.json"))?)
    }
}
