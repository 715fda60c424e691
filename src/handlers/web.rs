// src/handlers/web.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::handlers::api::network_health;
use crate::services::directory::{generate_logs, generate_rewards};
use crate::services::selection::{self, NodeFilter, SortDirection, SortKey, DASHBOARD_PROFILE, SEARCH_PROFILE};
use crate::services::stats;
use crate::storage::settings::{Settings, SettingsError};
use crate::templates;
use crate::utils::validation::{validate_min_uptime, validate_node_key, validate_region_filter};
use crate::AppState;

const DETAIL_LOG_COUNT: usize = 15;
const DETAIL_REWARD_COUNT: usize = 8;

#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub sort: Option<SortKey>,
    pub dir: Option<SortDirection>,
    pub page: Option<usize>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TableQuery>,
) -> Html<String> {
    let snapshot = state.feed.snapshot().await;
    let sort = query.sort.unwrap_or(DASHBOARD_PROFILE.sort);
    let direction = query.dir.unwrap_or(DASHBOARD_PROFILE.direction);

    let table = selection::select(
        &snapshot.nodes,
        &NodeFilter::default(),
        sort,
        direction,
        query.page.unwrap_or(1),
        DASHBOARD_PROFILE.page_size,
    );

    Html(templates::dashboard::render(
        &stats::aggregate(&snapshot.nodes),
        &network_health(&snapshot.nodes, snapshot.last_updated),
        &table,
        sort,
        direction,
    ))
}

pub async fn network_map(State(state): State<Arc<AppState>>) -> Html<String> {
    let nodes = state.feed.nodes().await;
    let regions = stats::storage_by_region(&nodes);
    Html(templates::network_map::render(&regions, &nodes))
}

/// Detail view. An unknown id shows the first node rather than an error.
pub async fn node_detail(
    State(state): State<Arc<AppState>>,
    Path(node_id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    if !validate_node_key(&node_id) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let node = match state.feed.find(&node_id).await {
        Some(node) => node,
        None => state
            .feed
            .nodes()
            .await
            .into_iter()
            .next()
            .ok_or(StatusCode::NOT_FOUND)?,
    };

    let (logs, rewards) = {
        let mut rng = rand::thread_rng();
        (
            generate_logs(&mut rng, DETAIL_LOG_COUNT),
            generate_rewards(&mut rng, DETAIL_REWARD_COUNT),
        )
    };

    Ok(Html(templates::node_detail::render(&node, &logs, &rewards)))
}

/// Form fields arrive as text; blanks mean "no filter".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub status: Option<String>,
    pub region: Option<String>,
    pub min_uptime: Option<String>,
    pub page: Option<usize>,
}

impl SearchQuery {
    fn filter(&self) -> Result<NodeFilter, &'static str> {
        let region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());
        if let Some(region) = region {
            validate_region_filter(region)?;
        }

        let min_uptime = match self.min_uptime.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let value: f64 = raw.parse().map_err(|_| "Minimum uptime must be a number")?;
                validate_min_uptime(value)?;
                Some(value).filter(|v| *v > 0.0)
            }
        };

        Ok(NodeFilter {
            status: self.status.clone(),
            region: region.map(String::from),
            min_uptime,
        })
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let (filter, error) = match query.filter() {
        Ok(filter) => (filter, None),
        Err(e) => (NodeFilter::default(), Some(e)),
    };

    let nodes = state.feed.nodes().await;
    let results = selection::select(
        &nodes,
        &filter,
        SEARCH_PROFILE.sort,
        SEARCH_PROFILE.direction,
        query.page.unwrap_or(1),
        SEARCH_PROFILE.page_size,
    );

    let html = Html(templates::search::render(&filter, &results, error));
    match error {
        Some(_) => (StatusCode::BAD_REQUEST, html).into_response(),
        None => html.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SettingsPageQuery {
    pub saved: Option<bool>,
}

pub async fn settings_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SettingsPageQuery>,
) -> Html<String> {
    let settings = state.settings.load().await;
    let notice = query.saved.unwrap_or(false).then_some("Settings saved successfully");
    Html(templates::settings::render(&settings, notice, None))
}

/// Unchecked checkboxes are absent from the form body.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub primary_rpc: String,
    #[serde(default)]
    pub backup_rpc: String,
    pub show_animations: Option<String>,
    pub enable_notifications: Option<String>,
    pub dev_mode: Option<String>,
}

impl From<SettingsForm> for Settings {
    fn from(form: SettingsForm) -> Self {
        Settings {
            primary_rpc: form.primary_rpc,
            backup_rpc: form.backup_rpc,
            show_animations: form.show_animations.is_some(),
            enable_notifications: form.enable_notifications.is_some(),
            dev_mode: form.dev_mode.is_some(),
        }
    }
}

pub async fn settings_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let submitted = Settings::from(form);

    match state.settings.save(submitted.clone()).await {
        Ok(_) => Redirect::to("/settings?saved=true").into_response(),
        Err(SettingsError::Invalid(reason)) => (
            StatusCode::BAD_REQUEST,
            Html(templates::settings::render(&submitted, None, Some(reason))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to save settings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(templates::settings::render(
                    &submitted,
                    None,
                    Some("Settings could not be saved"),
                )),
            )
                .into_response()
        }
    }
}
