// HTTP request handlers
use crate::domain::dashboard::{DashboardSearch, PanelSearch};
use crate::domain::link::extract_args;
use crate::domain::options::PanelQueryOptions;
use crate::domain::prometheus::{MatrixResponse, to_matrix_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

type Params = HashMap<String, String>;

const VARIABLE_PREFIX: &str = "var-";

enum PanelSelector {
    Id(i64),
    Title(String),
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_dashboards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DashboardSearch>>, ApiError> {
    Ok(Json(state.panel_service.search_dashboards().await?))
}

pub async fn list_panels(
    Path(uid): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PanelSearch>>, ApiError> {
    let dashboard = state.panel_service.get_dashboard(&uid).await?;
    Ok(Json(state.panel_service.panels_of(&dashboard)))
}

/// Resolved values of every `label_values(...)` variable of a dashboard
pub async fn dashboard_variables(
    Path(uid): Path<String>,
    Query(params): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<HashMap<String, Vec<String>>>, ApiError> {
    let mut options = options_from_params(&params)?;
    let dashboard = state.panel_service.get_dashboard(&uid).await?;
    let resolved = state
        .variable_service
        .resolve_variables(&dashboard, &mut options)
        .await?;
    Ok(Json(resolved))
}

pub async fn panel_query_range(
    Path((uid, panel_id)): Path<(String, i64)>,
    Query(params): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MatrixResponse>, ApiError> {
    query_panel(&state, &uid, PanelSelector::Id(panel_id), &params).await
}

pub async fn panel_query_range_by_title(
    Path(uid): Path<String>,
    Query(params): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MatrixResponse>, ApiError> {
    let title = params
        .get("title")
        .cloned()
        .ok_or_else(|| ApiError::BadRequest("missing title parameter".to_string()))?;
    query_panel(&state, &uid, PanelSelector::Title(title), &params).await
}

/// Queries the panel a Grafana UI link (`/d/{uid}/...?viewPanel={id}`) points at
pub async fn link_query_range(
    Query(params): Query<Params>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MatrixResponse>, ApiError> {
    let link = params
        .get("url")
        .ok_or_else(|| ApiError::BadRequest("missing url parameter".to_string()))?;
    let (uid, panel_id) = extract_args(link);
    if uid.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "not a dashboard panel link: {}",
            link
        )));
    }
    query_panel(&state, &uid, PanelSelector::Id(panel_id), &params).await
}

async fn query_panel(
    state: &AppState,
    uid: &str,
    selector: PanelSelector,
    params: &Params,
) -> Result<Json<MatrixResponse>, ApiError> {
    let mut options = options_from_params(params)?;
    let dashboard = state.panel_service.get_dashboard(uid).await?;

    // resolved label_values variables become available to the panel expressions
    state
        .variable_service
        .resolve_variables(&dashboard, &mut options)
        .await?;

    let results = match selector {
        PanelSelector::Id(id) => {
            state
                .panel_service
                .get_panel_data(&dashboard, id, &options)
                .await?
        }
        PanelSelector::Title(title) => {
            state
                .panel_service
                .get_panel_data_by_title(&dashboard, &title, &options)
                .await?
        }
    };

    Ok(Json(to_matrix_response(&results)))
}

/// `start`/`end` as unix seconds (fractions allowed), `var-<name>=<value>` overrides
pub fn options_from_params(params: &Params) -> Result<PanelQueryOptions, ApiError> {
    let mut options = PanelQueryOptions::new();
    if let Some(start) = params.get("start") {
        options.start = Some(parse_unix_secs("start", start)?);
    }
    if let Some(end) = params.get("end") {
        options.end = Some(parse_unix_secs("end", end)?);
    }

    for (key, value) in params {
        if let Some(name) = key.strip_prefix(VARIABLE_PREFIX) {
            options.variables.insert(name.to_string(), value.clone());
        }
    }

    Ok(options)
}

fn parse_unix_secs(name: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    raw.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite())
        .and_then(|secs| DateTime::from_timestamp_millis((secs * 1000.0) as i64))
        .ok_or_else(|| ApiError::BadRequest(format!("invalid {} timestamp: {}", name, raw)))
}
