// Domain layer - Grafana dashboard model and pure transformations
pub mod dashboard;
pub mod datasource;
pub mod error;
pub mod interval;
pub mod link;
pub mod options;
pub mod prometheus;
pub mod query;
pub mod results;
pub mod target;
pub mod variables;
