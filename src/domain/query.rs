// Outbound request models
use super::target::Target;
use serde::{Deserialize, Serialize};

/// Body of POST /api/ds/query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub queries: Vec<Target>,
    pub from: String,
    pub to: String,
}

/// Parameters of a Prometheus label values lookup proxied through a datasource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelValuesRequest {
    pub datasource_uid: String,
    pub label: String,
    /// Series selector for `match[]`; omitted when empty
    pub matcher: String,
    pub start: i64,
    pub end: Option<i64>,
}
