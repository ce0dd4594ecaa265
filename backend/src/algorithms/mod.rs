//! Wayfinding algorithms.
//!
//! Pure, synchronous computations over map snapshots. Nothing here touches
//! storage; the service layer loads the records and hands them in.

pub mod congestion;
pub mod geometry;
pub mod graph;
pub mod pathfinder;

pub use congestion::{
    aggregate_congestion, set_random_congestion, CheckpointSet, CongestionLevel,
    CongestionSnapshot, CongestionSource, FixedSequence, RandomCongestion,
};
pub use geometry::{orientation, segments_intersect, Orientation, Point, Segment};
pub use graph::{build_graph, AdjacencyMap, Neighbor};
pub use pathfinder::{shortest_path, NoRoute, NoRouteReason, Pathfinder, Route};
