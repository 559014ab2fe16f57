// Presentation layer - Prometheus compatible HTTP API over the panel pipeline
pub mod api_error;
pub mod app_state;
pub mod handlers;
pub mod routes;
