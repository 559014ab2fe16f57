// Router wiring
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_variables, health_check, link_query_range, list_dashboards, list_panels,
    panel_query_range, panel_query_range_by_title,
};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/v1/dashboards", get(list_dashboards))
        .route("/api/v1/dashboards/:uid/panels", get(list_panels))
        .route("/api/v1/dashboards/:uid/variables", get(dashboard_variables))
        .route(
            "/api/v1/dashboards/:uid/panels/:panel_id/query_range",
            get(panel_query_range),
        )
        .route(
            "/api/v1/dashboards/:uid/panel_by_title/query_range",
            get(panel_query_range_by_title),
        )
        .route("/api/v1/link/query_range", get(link_query_range))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
