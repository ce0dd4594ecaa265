//! Data Transfer Objects for the HTTP API.
//!
//! Map entities, write models and service results already derive
//! Serialize/Deserialize and are used directly; only the request and
//! response envelopes specific to HTTP live here.

use serde::{Deserialize, Serialize};

pub use crate::models::{
    Location, LocationUpdate, NewLocation, NewPath, NewWall, Path, PathUpdate, Wall,
};
pub use crate::services::{CongestionEvent, CongestionReport, MapData, SeedSummary};

use crate::models::LocationId;
use crate::services::{NavigationOutcome, NO_PATH_FOUND};

/// Request body for `POST /v1/map/navigate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub source_id: LocationId,
    pub destination_id: LocationId,
}

/// Navigation result. A missing route is reported in the body, not the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavigateResponse {
    Route {
        path: Vec<LocationId>,
        total_distance: f64,
    },
    NoPath {
        error: String,
    },
}

impl From<NavigationOutcome> for NavigateResponse {
    fn from(outcome: NavigationOutcome) -> Self {
        match outcome {
            NavigationOutcome::Found {
                path,
                total_distance,
            } => Self::Route {
                path,
                total_distance,
            },
            NavigationOutcome::NoPath { .. } => Self::NoPath {
                error: NO_PATH_FOUND.to_string(),
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Response for map population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulateResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: SeedSummary,
}
