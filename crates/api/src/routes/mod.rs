//! API routes

mod entitlements;
mod features;
mod plans;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the application router with all layers applied
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    let api = Router::new()
        // Catalog
        .route("/features", get(features::list_features))
        .route("/features/{sku}", get(features::get_feature))
        // Plans
        .route("/plans", get(plans::list_plans))
        .route("/plans/{tier}/features", get(plans::plan_features))
        .route("/plans/{from}/upgrade/{to}", get(plans::upgrade_preview))
        // Entitlements
        .route("/entitlements/check", get(entitlements::check_feature))
        .route("/entitlements/limit", get(entitlements::plan_limit))
        .route("/entitlements/gate", post(entitlements::gate))
        .route("/entitlements/limit-check", post(entitlements::limit_check))
        .route("/entitlements/resolve", post(entitlements::resolve))
        .route("/entitlements/invariants", get(entitlements::invariants));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]);

    if origins.is_empty() {
        tracing::warn!("No CORS allowlist configured, allowing any origin");
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    tracing::info!(
        allowed_origins = ?allowed,
        "CORS configured with {} allowed origins",
        allowed.len()
    );

    base.allow_origin(AllowOrigin::list(allowed))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tables_healthy": state.invariants.healthy,
    }))
}
