// Error types shared by every layer of the panel query pipeline
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GrafanaError>;

#[derive(Debug, Error)]
pub enum GrafanaError {
    /// The request never produced a response (connection refused, timeout, TLS...)
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Grafana answered with a status other than 200
    #[error("grafana returned status {status}; body: {body}")]
    Backend { status: u16, body: String },

    #[error("failed to decode grafana response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Template variable resolution failed (bad label_values query or envelope)
    #[error("failed to fetch variable values: {0}")]
    Fetch(String),

    /// A label values lookup for one template variable failed
    #[error("failed to get label values for variable {variable}: {source}")]
    Variable {
        variable: String,
        #[source]
        source: Box<GrafanaError>,
    },
}

impl GrafanaError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }

    /// Short machine-readable kind, used as `errorType` in API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Backend { .. } => "backend",
            Self::Decode(_) => "decode",
            Self::NotFound(_) => "not_found",
            Self::Config(_) => "config",
            Self::Fetch(_) | Self::Variable { .. } => "fetch",
        }
    }
}
