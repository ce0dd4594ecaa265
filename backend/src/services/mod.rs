//! Service layer for the wayfinding engine.
//!
//! Services sit between the HTTP handlers and the repositories. They pull a
//! fresh map snapshot, run the algorithms over it and persist the results.

pub mod congestion_feed;
pub mod map;
pub mod seed;

pub use congestion_feed::{CongestionEvent, CongestionFeed, DEFAULT_FEED_CAPACITY};
pub use map::{
    get_map_data, health_check, navigate, shared_congestion_source, update_and_fetch_congestion,
    CongestionReport, MapData, NavigationOutcome, PathCongestion, SharedCongestionSource,
    NO_PATH_FOUND,
};
pub use seed::{populate_map, SeedSummary};
