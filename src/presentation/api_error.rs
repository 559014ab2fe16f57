// Prometheus style error responses
use crate::domain::error::GrafanaError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    #[serde(rename = "errorType")]
    pub error_type: &'static str,
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Grafana(GrafanaError),
}

impl From<GrafanaError> for ApiError {
    fn from(err: GrafanaError) -> Self {
        Self::Grafana(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Grafana(GrafanaError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Grafana(GrafanaError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Grafana(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error_type, error) = match self {
            Self::BadRequest(msg) => ("bad_data", msg.clone()),
            Self::Grafana(err) => (err.kind(), err.to_string()),
        };
        ErrorBody {
            status: "error",
            error_type,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
