//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with permissive CORS.
pub fn create_router(state: AppState) -> Router {
    create_router_with_origins(state, &[])
}

/// Create the router, restricting CORS to `origins` unless the list is empty.
pub fn create_router_with_origins(state: AppState, origins: &[String]) -> Router {
    let api_v1 = Router::new()
        // Map queries
        .route("/map", get(handlers::get_map))
        .route("/map/navigate", post(handlers::navigate))
        .route("/map/update-congestion", post(handlers::update_congestion))
        .route("/map/congestion/stream", get(handlers::stream_congestion))
        .route("/map/populate", post(handlers::populate_map))
        // Map editing
        .route("/admin/map/location", post(handlers::create_location))
        .route(
            "/admin/map/location/{id}",
            put(handlers::update_location).delete(handlers::delete_location),
        )
        .route("/admin/map/path", post(handlers::create_path))
        .route(
            "/admin/map/path/{id}",
            put(handlers::update_path).delete(handlers::delete_path),
        )
        .route("/admin/map/wall", post(handlers::create_wall))
        .route(
            "/admin/map/wall/{id}",
            axum::routing::delete(handlers::delete_wall),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::MapRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn MapRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
    }

    #[test]
    fn test_router_with_origins() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn MapRepository>;
        let origins = vec!["http://localhost:5173".to_string(), "bad\norigin".to_string()];
        let _router = create_router_with_origins(AppState::new(repo), &origins);
    }
}
