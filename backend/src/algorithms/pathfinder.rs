//! Obstacle-aware shortest path search.
//!
//! Dijkstra over an [`AdjacencyMap`], rejecting any edge whose straight-line
//! walk between the two locations crosses a wall. Edge weights are the
//! stored path distances (always positive), so the first time a location is
//! popped from the queue its cost is final.
//!
//! Queue entries carry only their predecessor; the route is rebuilt from the
//! predecessor map once the destination is finalized. Equal-cost entries pop
//! in insertion order, which makes the chosen route deterministic for a
//! fixed input.

use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use super::geometry::{Point, Segment};
use super::graph::AdjacencyMap;
use crate::models::{Location, LocationId, Wall};

/// A pending queue entry.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    seq: u64,
    location_id: LocationId,
    predecessor: Option<LocationId>,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; older entries win ties.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A successful search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Locations from source to destination, inclusive.
    pub nodes: Vec<LocationId>,
    /// Sum of the traversed path distances.
    pub total_cost: f64,
    /// Locations finalized during the search.
    pub nodes_expanded: usize,
    /// Candidate edges discarded because a wall crossed them.
    pub edges_blocked: usize,
}

/// Why no route was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRouteReason {
    /// The source id is not a known location.
    UnknownSource,
    /// The destination id is not a known location.
    UnknownDestination,
    /// The search exhausted the reachable graph (disconnected or walled off).
    Unreachable,
}

/// Search outcome when the destination cannot be reached.
///
/// This is an expected result, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoRoute {
    pub reason: NoRouteReason,
    pub nodes_expanded: usize,
}

impl NoRoute {
    fn new(reason: NoRouteReason, nodes_expanded: usize) -> Self {
        Self {
            reason,
            nodes_expanded,
        }
    }

    /// Cost reported for an unreachable destination.
    pub fn cost(&self) -> f64 {
        f64::INFINITY
    }
}

impl fmt::Display for NoRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            NoRouteReason::UnknownSource => write!(f, "source location not found"),
            NoRouteReason::UnknownDestination => write!(f, "destination location not found"),
            NoRouteReason::Unreachable => {
                write!(f, "no path found due to obstacles or disconnected graph")
            }
        }
    }
}

/// Shortest-path planner over one graph snapshot.
pub struct Pathfinder<'a> {
    graph: &'a AdjacencyMap,
    walls: Vec<Segment>,
    coordinates: HashMap<LocationId, Point>,
}

impl<'a> Pathfinder<'a> {
    /// Create a planner.
    ///
    /// Locations with non-finite coordinates are left out of the coordinate
    /// index, so their expansion is skipped like any other unresolvable node.
    pub fn new(
        graph: &'a AdjacencyMap,
        walls: &[Wall],
        locations: &HashMap<LocationId, Location>,
    ) -> Self {
        let coordinates = locations
            .iter()
            .filter(|(_, location)| location.coordinates.is_finite())
            .map(|(id, location)| (*id, location.coordinates))
            .collect();

        Self {
            graph,
            walls: walls.iter().map(Wall::segment).collect(),
            coordinates,
        }
    }

    /// Whether the straight walk `from`–`to` crosses any wall.
    pub fn is_blocked(&self, from: Point, to: Point) -> bool {
        let walk = Segment::new(from, to);
        self.walls.iter().any(|wall| walk.intersects(wall))
    }

    /// Find the cheapest unobstructed route from `source` to `destination`.
    pub fn find_route(
        &self,
        source: LocationId,
        destination: LocationId,
    ) -> Result<Route, NoRoute> {
        trace!("[Pathfinder] find_route: {} -> {}", source, destination);

        if !self.coordinates.contains_key(&source) {
            debug!("[Pathfinder] unknown source {}", source);
            return Err(NoRoute::new(NoRouteReason::UnknownSource, 0));
        }
        if !self.coordinates.contains_key(&destination) {
            debug!("[Pathfinder] unknown destination {}", destination);
            return Err(NoRoute::new(NoRouteReason::UnknownDestination, 0));
        }

        let mut open = BinaryHeap::new();
        let mut predecessors: HashMap<LocationId, Option<LocationId>> = HashMap::new();
        let mut finalized: HashSet<LocationId> = HashSet::new();
        let mut seq = 0u64;
        let mut edges_blocked = 0usize;

        open.push(Frontier {
            cost: 0.0,
            seq,
            location_id: source,
            predecessor: None,
        });

        while let Some(current) = open.pop() {
            if !finalized.insert(current.location_id) {
                continue;
            }
            predecessors.insert(current.location_id, current.predecessor);

            if current.location_id == destination {
                let nodes = reconstruct(&predecessors, destination);
                debug!(
                    "[Pathfinder] route {} -> {}: {} hops, cost {:.2}, expanded {}, blocked {}",
                    source,
                    destination,
                    nodes.len().saturating_sub(1),
                    current.cost,
                    finalized.len(),
                    edges_blocked
                );
                return Ok(Route {
                    nodes,
                    total_cost: current.cost,
                    nodes_expanded: finalized.len(),
                    edges_blocked,
                });
            }

            let Some(&from) = self.coordinates.get(&current.location_id) else {
                debug!(
                    "[Pathfinder] no coordinates for {}, skipping expansion",
                    current.location_id
                );
                continue;
            };

            for neighbor in self.graph.neighbors(current.location_id) {
                if finalized.contains(&neighbor.location_id) {
                    continue;
                }
                let Some(&to) = self.coordinates.get(&neighbor.location_id) else {
                    trace!(
                        "[Pathfinder] no coordinates for neighbor {}, skipping edge",
                        neighbor.location_id
                    );
                    continue;
                };
                if self.is_blocked(from, to) {
                    trace!(
                        "[Pathfinder] edge {} -> {} blocked by wall",
                        current.location_id,
                        neighbor.location_id
                    );
                    edges_blocked += 1;
                    continue;
                }

                seq += 1;
                open.push(Frontier {
                    cost: current.cost + neighbor.weight,
                    seq,
                    location_id: neighbor.location_id,
                    predecessor: Some(current.location_id),
                });
            }
        }

        debug!(
            "[Pathfinder] FAILED: {} unreachable from {} (expanded {}, blocked {})",
            destination,
            source,
            finalized.len(),
            edges_blocked
        );
        Err(NoRoute::new(NoRouteReason::Unreachable, finalized.len()))
    }
}

fn reconstruct(
    predecessors: &HashMap<LocationId, Option<LocationId>>,
    destination: LocationId,
) -> Vec<LocationId> {
    let mut nodes = vec![destination];
    let mut cursor = destination;
    while let Some(Some(previous)) = predecessors.get(&cursor) {
        nodes.push(*previous);
        cursor = *previous;
    }
    nodes.reverse();
    nodes
}

/// Convenience wrapper: build a [`Pathfinder`] and run one search.
pub fn shortest_path(
    graph: &AdjacencyMap,
    walls: &[Wall],
    locations: &HashMap<LocationId, Location>,
    source: LocationId,
    destination: LocationId,
) -> Result<Route, NoRoute> {
    Pathfinder::new(graph, walls, locations).find_route(source, destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::graph::build_graph;
    use crate::models::{NewLocation, Path, PathId, WallId};

    fn locations(points: &[(i64, f64, f64)]) -> HashMap<LocationId, Location> {
        points
            .iter()
            .map(|&(id, x, y)| {
                (
                    LocationId(id),
                    NewLocation::new(format!("L{id}"), "gate", x, y).into_location(LocationId(id)),
                )
            })
            .collect()
    }

    fn path(id: i64, source: i64, destination: i64, distance: f64) -> Path {
        Path {
            id: PathId(id),
            source_id: LocationId(source),
            destination_id: LocationId(destination),
            distance,
            congestion: 1,
        }
    }

    fn wall(x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall {
            id: WallId(1),
            x1,
            y1,
            x2,
            y2,
        }
    }

    fn ids(route: &Route) -> Vec<i64> {
        route.nodes.iter().map(|id| id.value()).collect()
    }

    fn triangle() -> (HashMap<LocationId, Location>, Vec<Path>) {
        (
            locations(&[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 5.0, 5.0)]),
            vec![path(1, 1, 2, 10.0), path(2, 1, 3, 7.0), path(3, 3, 2, 7.0)],
        )
    }

    #[test]
    fn test_direct_edge_is_cheaper() {
        let (locs, paths) = triangle();
        let graph = build_graph(&paths);
        let route = shortest_path(&graph, &[], &locs, LocationId(1), LocationId(2)).unwrap();
        assert_eq!(ids(&route), vec![1, 2]);
        assert_eq!(route.total_cost, 10.0);
    }

    #[test]
    fn test_wall_forces_detour() {
        let (locs, paths) = triangle();
        let graph = build_graph(&paths);
        let walls = vec![wall(5.0, -1.0, 5.0, 1.0)];
        let route = shortest_path(&graph, &walls, &locs, LocationId(1), LocationId(2)).unwrap();
        assert_eq!(ids(&route), vec![1, 3, 2]);
        assert_eq!(route.total_cost, 14.0);
        assert!(route.edges_blocked >= 1);
    }

    #[test]
    fn test_source_equals_destination() {
        let (locs, paths) = triangle();
        let graph = build_graph(&paths);
        let route = shortest_path(&graph, &[], &locs, LocationId(3), LocationId(3)).unwrap();
        assert_eq!(ids(&route), vec![3]);
        assert_eq!(route.total_cost, 0.0);
    }

    #[test]
    fn test_isolated_location_routes_to_itself() {
        let locs = locations(&[(9, 1.0, 1.0)]);
        let graph = build_graph(&[]);
        let route = shortest_path(&graph, &[], &locs, LocationId(9), LocationId(9)).unwrap();
        assert_eq!(ids(&route), vec![9]);
    }

    #[test]
    fn test_unknown_endpoints() {
        let (locs, paths) = triangle();
        let graph = build_graph(&paths);
        let err = shortest_path(&graph, &[], &locs, LocationId(42), LocationId(2)).unwrap_err();
        assert_eq!(err.reason, NoRouteReason::UnknownSource);
        let err = shortest_path(&graph, &[], &locs, LocationId(1), LocationId(42)).unwrap_err();
        assert_eq!(err.reason, NoRouteReason::UnknownDestination);
        assert!(err.cost().is_infinite());
    }

    #[test]
    fn test_wall_across_bridge_disconnects() {
        // Two components joined by the single 2-3 edge.
        let locs = locations(&[(1, 0.0, 0.0), (2, 2.0, 0.0), (3, 6.0, 0.0), (4, 8.0, 0.0)]);
        let paths = vec![path(1, 1, 2, 2.0), path(2, 2, 3, 4.0), path(3, 3, 4, 2.0)];
        let graph = build_graph(&paths);

        let route = shortest_path(&graph, &[], &locs, LocationId(1), LocationId(4)).unwrap();
        assert_eq!(ids(&route), vec![1, 2, 3, 4]);
        assert_eq!(route.total_cost, 8.0);

        let walls = vec![wall(4.0, -1.0, 4.0, 1.0)];
        let err = shortest_path(&graph, &walls, &locs, LocationId(1), LocationId(4)).unwrap_err();
        assert_eq!(err.reason, NoRouteReason::Unreachable);
    }

    #[test]
    fn test_disconnected_graph() {
        let locs = locations(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 5.0, 5.0)]);
        let graph = build_graph(&[path(1, 1, 2, 1.0)]);
        let err = shortest_path(&graph, &[], &locs, LocationId(1), LocationId(3)).unwrap_err();
        assert_eq!(err.reason, NoRouteReason::Unreachable);
        assert_eq!(err.nodes_expanded, 2);
    }

    #[test]
    fn test_missing_coordinates_are_skipped() {
        // Location 5 is referenced by a path but unknown to the location set.
        let locs = locations(&[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
        let paths = vec![path(1, 1, 5, 1.0), path(2, 5, 2, 1.0), path(3, 1, 2, 20.0)];
        let graph = build_graph(&paths);
        let route = shortest_path(&graph, &[], &locs, LocationId(1), LocationId(2)).unwrap();
        assert_eq!(ids(&route), vec![1, 2]);
        assert_eq!(route.total_cost, 20.0);
    }

    #[test]
    fn test_parallel_paths_prefer_cheaper() {
        let locs = locations(&[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
        let graph = build_graph(&[path(1, 1, 2, 9.0), path(2, 2, 1, 4.0)]);
        let route = shortest_path(&graph, &[], &locs, LocationId(1), LocationId(2)).unwrap();
        assert_eq!(route.total_cost, 4.0);
    }

    #[test]
    fn test_equal_cost_tie_is_deterministic() {
        // 1 -> 2 -> 4 and 1 -> 3 -> 4 both cost 2; the first-inserted edge wins.
        let locs = locations(&[(1, 0.0, 0.0), (2, 1.0, 1.0), (3, 1.0, -1.0), (4, 2.0, 0.0)]);
        let paths = vec![
            path(1, 1, 2, 1.0),
            path(2, 1, 3, 1.0),
            path(3, 2, 4, 1.0),
            path(4, 3, 4, 1.0),
        ];
        let graph = build_graph(&paths);
        for _ in 0..10 {
            let route = shortest_path(&graph, &[], &locs, LocationId(1), LocationId(4)).unwrap();
            assert_eq!(ids(&route), vec![1, 2, 4]);
        }
    }

    #[test]
    fn test_degenerate_wall_on_node_blocks_incident_edges() {
        let (locs, paths) = triangle();
        let graph = build_graph(&paths);
        let walls = vec![wall(5.0, 5.0, 5.0, 5.0)];
        // Every edge touching location 3 is blocked; the direct edge stays open.
        let route = shortest_path(&graph, &walls, &locs, LocationId(1), LocationId(2)).unwrap();
        assert_eq!(ids(&route), vec![1, 2]);
        let err = shortest_path(&graph, &walls, &locs, LocationId(1), LocationId(3)).unwrap_err();
        assert_eq!(err.reason, NoRouteReason::Unreachable);
    }
}
