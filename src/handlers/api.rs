// src/handlers/api.rs
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::models::*;
use crate::services::selection::{self, NodeFilter, Selection, SortDirection, SortKey, DASHBOARD_PROFILE};
use crate::services::stats;
use crate::storage::settings::{Settings, SettingsError};
use crate::utils::csv_export;
use crate::utils::validation::{validate_min_uptime, validate_node_key, validate_region_filter};
use crate::AppState;

const MAX_PAGE_SIZE: usize = 100;

/// Live node list in the `{pNodes, timestamp}` envelope.
pub async fn list_pnodes(State(state): State<Arc<AppState>>) -> Response {
    let client = state.feed.client();

    match tokio::time::timeout(state.config.request_deadline(), client.fetch_nodes()).await {
        Ok(p_nodes) => Json(PnodesResponse {
            p_nodes,
            timestamp: Utc::now().timestamp_millis(),
        })
        .into_response(),
        Err(_) => {
            error!(
                "Fetching pNodes exceeded {}s deadline",
                state.config.request_deadline_secs
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PnodesErrorResponse {
                    error: "Failed to fetch pNodes".to_string(),
                    p_nodes: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}

/// One node by pubkey, live first, then from the current snapshot.
pub async fn get_pnode(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Node>, StatusCode> {
    if !validate_node_key(&key) {
        return Err(StatusCode::BAD_REQUEST);
    }

    if let Some(node) = state.feed.client().fetch_node_by_pubkey(&key).await {
        return Ok(Json(node));
    }

    state
        .feed
        .find(&key)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn network_stats(State(state): State<Arc<AppState>>) -> Json<Stats> {
    let nodes = state.feed.nodes().await;
    Json(stats::aggregate(&nodes))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeListQuery {
    pub status: Option<String>,
    pub region: Option<String>,
    pub min_uptime: Option<f64>,
    pub sort: Option<SortKey>,
    pub dir: Option<SortDirection>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl NodeListQuery {
    pub fn filter(&self) -> Result<NodeFilter, &'static str> {
        if let Some(region) = &self.region {
            validate_region_filter(region)?;
        }
        if let Some(min_uptime) = self.min_uptime {
            validate_min_uptime(min_uptime)?;
        }

        Ok(NodeFilter {
            status: self.status.clone(),
            region: self.region.clone(),
            min_uptime: self.min_uptime,
        })
    }
}

/// Filtered, sorted page of the current snapshot.
pub async fn list_nodes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NodeListQuery>,
) -> Result<Json<Selection>, (StatusCode, String)> {
    let filter = query
        .filter()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let nodes = state.feed.nodes().await;
    let page_size = query
        .page_size
        .unwrap_or(DASHBOARD_PROFILE.page_size)
        .clamp(1, MAX_PAGE_SIZE);

    Ok(Json(selection::select(
        &nodes,
        &filter,
        query.sort.unwrap_or(DASHBOARD_PROFILE.sort),
        query.dir.unwrap_or(DASHBOARD_PROFILE.direction),
        query.page.unwrap_or(1),
        page_size,
    )))
}

/// CSV of the whole snapshot in its current order.
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let nodes = state.feed.nodes().await;
    let body = csv_export::export_nodes(&nodes).map_err(|e| {
        error!("CSV export failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        csv_export::export_filename(Utc::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings.load().await)
}

pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Settings>,
) -> Result<Json<Settings>, (StatusCode, String)> {
    match state.settings.save(payload).await {
        Ok(saved) => Ok(Json(saved)),
        Err(SettingsError::Invalid(reason)) => Err((StatusCode::BAD_REQUEST, reason.to_string())),
        Err(e) => {
            warn!("Failed to save settings: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Failed to save settings".to_string()))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub prpc_endpoint: String,
    pub total_nodes: usize,
    pub online_nodes: usize,
    pub network: NetworkHealth,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    let snapshot = state.feed.snapshot().await;
    let summary = stats::aggregate(&snapshot.nodes);

    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        prpc_endpoint: state.feed.client().endpoint().to_string(),
        total_nodes: summary.total_nodes,
        online_nodes: summary.online_nodes,
        network: network_health(&snapshot.nodes, snapshot.last_updated),
    })
}

pub fn network_health(nodes: &[Node], last_updated: chrono::DateTime<Utc>) -> NetworkHealth {
    NetworkHealth {
        average_latency: stats::average_latency(nodes),
        active_peers: stats::estimated_peers(nodes),
        last_updated,
    }
}
