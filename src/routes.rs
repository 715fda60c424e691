// src/routes.rs
use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{api, web};
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let limiter = state.rate_limiter.clone();

    Router::new()
        // ==================
        // WEB UI ROUTES
        // ==================
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(web::dashboard))
        .route("/network-map", get(web::network_map))
        .route("/pnode/:id", get(web::node_detail))
        .route("/search", get(web::search))
        .route("/settings", get(web::settings_page).post(web::settings_submit))
        // ==================
        // API ROUTES
        // ==================
        .route("/pnodes", get(api::list_pnodes))
        .route("/api/pnodes", get(api::list_pnodes))
        .route("/api/pnodes/export.csv", get(api::export_csv))
        .route("/api/pnodes/:pubkey", get(api::get_pnode))
        .route("/api/nodes", get(api::list_nodes))
        .route("/api/stats", get(api::network_stats))
        .route("/api/settings", get(api::get_settings).post(api::save_settings))
        .route("/api/health", get(api::health_check))
        .with_state(state)
        .layer(axum::middleware::from_fn(
            crate::middleware::security::security_headers,
        ))
        .layer(axum::middleware::from_fn(
            crate::middleware::security::attack_prevention,
        ))
        .layer(axum::middleware::from_fn_with_state(
            limiter,
            crate::middleware::rate_limit::rate_limit,
        ))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
