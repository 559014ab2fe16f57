// Grafana HTTP API client
use crate::application::grafana_api::GrafanaApi;
use crate::domain::dashboard::{DashboardResponse, DashboardSearch};
use crate::domain::datasource::Datasource;
use crate::domain::error::{GrafanaError, Result};
use crate::domain::query::{LabelValuesRequest, QueryRequest};
use crate::domain::results::Results;
use crate::infrastructure::config::GrafanaSettings;
use crate::infrastructure::transport::{HttpRequest, HttpTransport, Method, ReqwestTransport};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct LabelValuesResponse {
    status: String,
    #[serde(default)]
    data: Vec<String>,
}

#[derive(Clone)]
pub struct GrafanaClient {
    host: String,
    token: Option<String>,
    transport: Arc<dyn HttpTransport>,
}

impl GrafanaClient {
    /// Client for the Grafana instance at `url`, e.g. `http://grafana:3000` or
    /// `https://host/grafana/` when served under a sub path.
    pub fn new(url: &str) -> Result<Self> {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT)?;
        Self::with_transport(url, Arc::new(transport))
    }

    pub fn from_settings(settings: &GrafanaSettings) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(settings.timeout_secs))?;
        let client = Self::with_transport(&settings.url, Arc::new(transport))?;
        Ok(client.with_token(settings.token.clone().unwrap_or_default()))
    }

    pub fn with_transport(url: &str, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| GrafanaError::Config(format!("invalid grafana url {:?}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GrafanaError::Config(format!(
                "unsupported scheme in grafana url {:?}",
                url
            )));
        }

        Ok(Self {
            host: parsed.as_str().trim_end_matches('/').to_string(),
            token: None,
            transport,
        })
    }

    /// API token sent as a bearer header; an empty token disables the header
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    /// Base URL without trailing slash
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn send(&self, method: Method, url: String, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        tracing::debug!(?method, url = %url, "sending grafana request");

        let response = self
            .transport
            .execute(HttpRequest {
                method,
                url,
                bearer_token: self.token.clone(),
                body,
            })
            .await?;

        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "got grafana response"
        );

        if response.status != 200 {
            return Err(GrafanaError::Backend {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response.body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::Get, format!("{}{}", self.host, path), None).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn label_values_url(&self, request: &LabelValuesRequest) -> String {
        let mut url = format!(
            "{}/api/datasources/uid/{}/resources/api/v1/label/{}/values?",
            self.host,
            urlencoding::encode(&request.datasource_uid),
            urlencoding::encode(&request.label),
        );
        if !request.matcher.is_empty() {
            url.push_str(&format!("match[]={}&", urlencoding::encode(&request.matcher)));
        }
        url.push_str(&format!("start={}", request.start));
        if let Some(end) = request.end {
            url.push_str(&format!("&end={}", end));
        }
        url
    }
}

#[async_trait]
impl GrafanaApi for GrafanaClient {
    async fn get_dashboard(&self, uid: &str) -> Result<DashboardResponse> {
        self.get_json(&format!("/api/dashboards/uid/{}", urlencoding::encode(uid)))
            .await
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        self.get_json("/api/datasources").await
    }

    async fn query(&self, request: &QueryRequest) -> Result<Results> {
        let body = serde_json::to_vec(request)?;
        let response = self
            .send(Method::Post, format!("{}/api/ds/query", self.host), Some(body))
            .await?;
        Ok(serde_json::from_slice(&response)?)
    }

    async fn label_values(&self, request: &LabelValuesRequest) -> Result<Vec<String>> {
        let body = self
            .send(Method::Get, self.label_values_url(request), None)
            .await?;

        let envelope: LabelValuesResponse = serde_json::from_slice(&body)
            .map_err(|e| GrafanaError::Fetch(format!("failed to decode label values: {}", e)))?;

        if envelope.status != "success" {
            return Err(GrafanaError::Fetch(format!(
                "grafana API returned status: {}",
                envelope.status
            )));
        }

        Ok(envelope.data)
    }

    async fn search_dashboards(&self) -> Result<Vec<DashboardSearch>> {
        self.get_json("/api/search?type=dash-db").await
    }
}
