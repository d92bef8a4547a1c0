//! HTTP routes for the relay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod fallback;
pub mod health;
pub mod proxy;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::fault_boundary, proxy::headers::API_KEY_HEADER_NAME, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_bytes;

    let routes = Router::new()
        .route("/health", get(health::health_check).fallback(fallback::not_found))
        .route(
            "/proxy/gemini/:model_name",
            post(proxy::forward).fallback(fallback::not_found),
        )
        .fallback(fallback::not_found)
        .with_state(state);

    apply_global_layers(routes, body_limit)
}

/// Wrap a router with the layers every route shares
///
/// Layers run top to bottom; the fault boundary encloses everything else.
pub fn apply_global_layers(router: Router, body_limit: usize) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(fault_boundary::layer())
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer())
            .layer(DefaultBodyLimit::max(body_limit)),
    )
}

/// CORS configuration: any origin, the methods and headers clients use
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            API_KEY_HEADER_NAME,
        ])
}
