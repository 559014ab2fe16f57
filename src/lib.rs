// Grafana panel data - turns dashboard panels into executed queries and Prometheus-style results
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::error::{GrafanaError, Result};
