//! Adjacency structure built from stored path records.
//!
//! Paths are stored once but walked both ways, so every record contributes
//! an entry under each endpoint. The map is rebuilt for every search and
//! never outlives it.

use std::collections::HashMap;

use log::warn;

use crate::models::{LocationId, Path, PathId};

/// One traversal direction of a stored path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub location_id: LocationId,
    pub weight: f64,
    pub path_id: PathId,
}

/// Undirected adjacency map keyed by location id.
///
/// Locations without incident paths have no entry; [`AdjacencyMap::neighbors`]
/// returns an empty slice for them. Parallel paths are all kept.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyMap {
    neighbors: HashMap<LocationId, Vec<Neighbor>>,
    edge_count: usize,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert both traversal directions of a path.
    ///
    /// Records with a non-positive or non-finite distance are skipped.
    /// Returns whether the path was inserted.
    pub fn insert_path(&mut self, path: &Path) -> bool {
        if !(path.distance.is_finite() && path.distance > 0.0) {
            warn!(
                "Skipping path {} ({} -> {}): invalid distance {}",
                path.id, path.source_id, path.destination_id, path.distance
            );
            return false;
        }

        self.neighbors
            .entry(path.source_id)
            .or_default()
            .push(Neighbor {
                location_id: path.destination_id,
                weight: path.distance,
                path_id: path.id,
            });
        self.neighbors
            .entry(path.destination_id)
            .or_default()
            .push(Neighbor {
                location_id: path.source_id,
                weight: path.distance,
                path_id: path.id,
            });
        self.edge_count += 1;
        true
    }

    pub fn neighbors(&self, location_id: LocationId) -> &[Neighbor] {
        self.neighbors
            .get(&location_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, location_id: LocationId) -> bool {
        self.neighbors.contains_key(&location_id)
    }

    /// Number of locations with at least one incident path.
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of path records inserted (each counted once).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// Build the undirected adjacency map for a set of paths.
pub fn build_graph(paths: &[Path]) -> AdjacencyMap {
    let mut graph = AdjacencyMap::new();
    for path in paths {
        graph.insert_path(path);
    }
    graph
}
