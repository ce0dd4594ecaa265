//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path as UrlPath, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use super::dto::{
    CongestionEvent, CongestionReport, HealthResponse, Location, LocationUpdate, MapData,
    NavigateRequest, NavigateResponse, NewLocation, NewPath, NewWall, Path, PathUpdate,
    PopulateResponse, Wall,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{LocationId, PathId, WallId};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for handlers that create a resource.
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e.message()),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Map queries
// =============================================================================

/// GET /v1/map
pub async fn get_map(State(state): State<AppState>) -> HandlerResult<MapData> {
    let data = services::get_map_data(state.repository.as_ref()).await?;
    Ok(Json(data))
}

/// POST /v1/map/navigate
///
/// Always 200 unless storage fails; an impossible route yields `{"error": ...}`.
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> HandlerResult<NavigateResponse> {
    let outcome = services::navigate(
        state.repository.as_ref(),
        request.source_id,
        request.destination_id,
    )
    .await?;
    Ok(Json(outcome.into()))
}

/// POST /v1/map/update-congestion
///
/// Re-rolls every path's congestion and publishes the result to SSE subscribers.
pub async fn update_congestion(State(state): State<AppState>) -> HandlerResult<CongestionReport> {
    let report = services::update_and_fetch_congestion(
        state.repository.as_ref(),
        &state.checkpoints,
        &state.congestion_source,
    )
    .await?;

    let delivered = state
        .congestion_feed
        .publish(CongestionEvent::from_report(&report));
    tracing::debug!("Congestion event delivered to {} subscriber(s)", delivered);

    Ok(Json(report))
}

/// GET /v1/map/congestion/stream
///
/// Stream congestion refreshes via Server-Sent Events (SSE).
pub async fn stream_congestion(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut receiver = state.congestion_feed.subscribe();

    let stream = async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(data) => {
                        yield Ok(Event::default().event("congestion").data(data));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to serialize congestion event: {}", e);
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    yield Ok(Event::default().event("lagged").data(skipped.to_string()));
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// POST /v1/map/populate
///
/// Replace the current map with the sample airport layout.
pub async fn populate_map(State(state): State<AppState>) -> HandlerResult<PopulateResponse> {
    let summary = services::populate_map(state.repository.as_ref()).await?;
    Ok(Json(PopulateResponse {
        message: "Map populated with sample airport data".to_string(),
        summary,
    }))
}

// =============================================================================
// Admin: locations
// =============================================================================

/// POST /v1/admin/map/location
pub async fn create_location(
    State(state): State<AppState>,
    Json(location): Json<NewLocation>,
) -> CreatedResult<Location> {
    let created = db_services::create_location(state.repository.as_ref(), location).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /v1/admin/map/location/{id}
pub async fn update_location(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
    Json(update): Json<LocationUpdate>,
) -> HandlerResult<Location> {
    let updated =
        db_services::update_location(state.repository.as_ref(), LocationId::new(id), update)
            .await?;
    Ok(Json(updated))
}

/// DELETE /v1/admin/map/location/{id}
pub async fn delete_location(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
) -> HandlerResult<Location> {
    let deleted =
        db_services::delete_location(state.repository.as_ref(), LocationId::new(id)).await?;
    Ok(Json(deleted))
}

// =============================================================================
// Admin: paths
// =============================================================================

/// POST /v1/admin/map/path
pub async fn create_path(
    State(state): State<AppState>,
    Json(path): Json<NewPath>,
) -> CreatedResult<Path> {
    let created = db_services::create_path(state.repository.as_ref(), path).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /v1/admin/map/path/{id}
pub async fn update_path(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
    Json(update): Json<PathUpdate>,
) -> HandlerResult<Path> {
    let updated =
        db_services::update_path(state.repository.as_ref(), PathId::new(id), update).await?;
    Ok(Json(updated))
}

/// DELETE /v1/admin/map/path/{id}
pub async fn delete_path(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
) -> HandlerResult<Path> {
    let deleted = db_services::delete_path(state.repository.as_ref(), PathId::new(id)).await?;
    Ok(Json(deleted))
}

// =============================================================================
// Admin: walls
// =============================================================================

/// POST /v1/admin/map/wall
pub async fn create_wall(
    State(state): State<AppState>,
    Json(wall): Json<NewWall>,
) -> CreatedResult<Wall> {
    let created = db_services::create_wall(state.repository.as_ref(), wall).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /v1/admin/map/wall/{id}
pub async fn delete_wall(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
) -> HandlerResult<Wall> {
    let deleted = db_services::delete_wall(state.repository.as_ref(), WallId::new(id)).await?;
    Ok(Json(deleted))
}
