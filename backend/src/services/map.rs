//! Map service: the query surface of the wayfinding engine.
//!
//! Every call fetches a fresh snapshot from the repository, builds what it
//! needs and throws it away again. Nothing is cached between requests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::algorithms::{
    aggregate_congestion, build_graph, set_random_congestion, CheckpointSet, CongestionLevel,
    CongestionSource, NoRouteReason, Pathfinder,
};
use crate::db::repository::{MapRepository, RepositoryResult};
use crate::models::{Location, LocationId, Path, PathId, Wall};

/// Message returned when navigation finds no route.
pub const NO_PATH_FOUND: &str = "No path found";

/// Congestion source shared across requests.
///
/// The lock is only held while drawing readings, never across an `.await`.
pub type SharedCongestionSource = Arc<Mutex<Box<dyn CongestionSource + Send>>>;

pub fn shared_congestion_source<S>(source: S) -> SharedCongestionSource
where
    S: CongestionSource + Send + 'static,
{
    Arc::new(Mutex::new(Box::new(source)))
}

/// Full read view of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub locations: Vec<Location>,
    pub paths: Vec<Path>,
    pub walls: Vec<Wall>,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Found {
        path: Vec<LocationId>,
        total_distance: f64,
    },
    /// No route exists. A normal answer, reported to clients as a soft error.
    NoPath { reason: NoRouteReason },
}

/// Per-path congestion after an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCongestion {
    pub id: PathId,
    pub source: LocationId,
    pub destination: LocationId,
    pub congestion: i32,
}

impl From<&Path> for PathCongestion {
    fn from(path: &Path) -> Self {
        Self {
            id: path.id,
            source: path.source_id,
            destination: path.destination_id,
            congestion: path.congestion,
        }
    }
}

/// Outcome of a congestion refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongestionReport {
    pub level: CongestionLevel,
    pub value: f64,
    pub paths: Vec<PathCongestion>,
}

/// All locations, paths and walls.
pub async fn get_map_data<R: MapRepository + ?Sized>(repo: &R) -> RepositoryResult<MapData> {
    let (locations, paths, walls) =
        tokio::try_join!(repo.list_locations(), repo.list_paths(), repo.list_walls())?;
    debug!(
        "Map snapshot: {} locations, {} paths, {} walls",
        locations.len(),
        paths.len(),
        walls.len()
    );
    Ok(MapData {
        locations,
        paths,
        walls,
    })
}

/// Shortest unobstructed route between two locations.
///
/// Unknown endpoints and unreachable destinations both come back as
/// [`NavigationOutcome::NoPath`]; only storage failures are errors.
pub async fn navigate<R: MapRepository + ?Sized>(
    repo: &R,
    source_id: LocationId,
    destination_id: LocationId,
) -> RepositoryResult<NavigationOutcome> {
    let MapData {
        locations,
        paths,
        walls,
    } = get_map_data(repo).await?;

    let graph = build_graph(&paths);
    let locations_by_id: HashMap<LocationId, Location> = locations
        .into_iter()
        .map(|location| (location.id, location))
        .collect();

    let outcome = match Pathfinder::new(&graph, &walls, &locations_by_id)
        .find_route(source_id, destination_id)
    {
        Ok(route) => {
            info!(
                "Route {} -> {}: {} stops, distance {:.2}",
                source_id,
                destination_id,
                route.nodes.len(),
                route.total_cost
            );
            NavigationOutcome::Found {
                path: route.nodes,
                total_distance: route.total_cost,
            }
        }
        Err(no_route) => {
            info!("No route {} -> {}: {}", source_id, destination_id, no_route);
            NavigationOutcome::NoPath {
                reason: no_route.reason,
            }
        }
    };
    Ok(outcome)
}

/// Randomize every path's congestion, persist it and report the level over
/// the checkpoint paths.
///
/// Paths deleted between the read and the write are left out of the report.
pub async fn update_and_fetch_congestion<R: MapRepository + ?Sized>(
    repo: &R,
    checkpoints: &CheckpointSet,
    source: &SharedCongestionSource,
) -> RepositoryResult<CongestionReport> {
    let paths = repo.list_paths().await?;

    let paths = {
        let mut source = source.lock();
        set_random_congestion(paths, &mut **source)
    };

    let updates: Vec<(PathId, i32)> = paths.iter().map(|p| (p.id, p.congestion)).collect();
    let written: HashSet<PathId> = repo
        .update_path_congestion(&updates)
        .await?
        .into_iter()
        .collect();
    if written.len() < paths.len() {
        debug!(
            "{} path(s) deleted during congestion refresh",
            paths.len() - written.len()
        );
    }
    let paths: Vec<Path> = paths
        .into_iter()
        .filter(|path| written.contains(&path.id))
        .collect();

    let snapshot = aggregate_congestion(checkpoints.select(&paths));
    info!(
        "Congestion refreshed for {} paths: {} ({:.2})",
        paths.len(),
        snapshot.level,
        snapshot.value
    );

    Ok(CongestionReport {
        level: snapshot.level,
        value: snapshot.value,
        paths: paths.iter().map(PathCongestion::from).collect(),
    })
}

/// Check repository connectivity.
pub async fn health_check<R: MapRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::FixedSequence;
    use crate::db::repository::{LocationRepository, PathRepository, WallRepository};
    use crate::db::LocalRepository;
    use crate::models::{NewLocation, NewPath, NewWall};

    async fn triangle() -> LocalRepository {
        let repo = LocalRepository::new();
        for (id, x, y) in [(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 5.0, 5.0)] {
            repo.create_location(NewLocation::new(format!("L{id}"), "gate", x, y).with_id(id))
                .await
                .unwrap();
        }
        repo.create_path(NewPath::new(1, 2, 10.0)).await.unwrap();
        repo.create_path(NewPath::new(1, 3, 7.0)).await.unwrap();
        repo.create_path(NewPath::new(3, 2, 7.0)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_navigate_direct_route() {
        let repo = triangle().await;
        let outcome = navigate(&repo, LocationId(1), LocationId(2)).await.unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Found {
                path: vec![LocationId(1), LocationId(2)],
                total_distance: 10.0
            }
        );
    }

    #[tokio::test]
    async fn test_navigate_detours_around_wall() {
        let repo = triangle().await;
        repo.create_wall(NewWall::new(5.0, -1.0, 5.0, 1.0))
            .await
            .unwrap();
        let outcome = navigate(&repo, LocationId(1), LocationId(2)).await.unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Found {
                path: vec![LocationId(1), LocationId(3), LocationId(2)],
                total_distance: 14.0
            }
        );
    }

    #[tokio::test]
    async fn test_navigate_unknown_endpoint_is_soft() {
        let repo = triangle().await;
        let outcome = navigate(&repo, LocationId(1), LocationId(99)).await.unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::NoPath {
                reason: NoRouteReason::UnknownDestination
            }
        );
    }

    #[tokio::test]
    async fn test_congestion_update_persists_and_aggregates() {
        let repo = triangle().await;
        // Paths in id order: 1->2, 1->3, 3->2.
        let source = shared_congestion_source(FixedSequence::new(vec![2, 9, 4]));
        let checkpoints = CheckpointSet::new([LocationId(2)]);

        let report = update_and_fetch_congestion(&repo, &checkpoints, &source)
            .await
            .unwrap();

        assert_eq!(report.paths.len(), 3);
        assert_eq!(report.value, 3.0);
        assert_eq!(report.level, CongestionLevel::Low);

        let stored: Vec<i32> = repo
            .list_paths()
            .await
            .unwrap()
            .iter()
            .map(|p| p.congestion)
            .collect();
        assert_eq!(stored, vec![2, 9, 4]);
    }

    #[tokio::test]
    async fn test_congestion_without_checkpoint_paths_is_zero() {
        let repo = triangle().await;
        let source = shared_congestion_source(FixedSequence::new(vec![10]));
        let report = update_and_fetch_congestion(&repo, &CheckpointSet::default(), &source)
            .await
            .unwrap();
        assert_eq!(report.value, 0.0);
        assert_eq!(report.level, CongestionLevel::Low);
        assert!(report.paths.iter().all(|p| p.congestion == 10));
    }
}
