//! Sample airport layout.
//!
//! Two gate piers (A, B) north of a security checkpoint, check-in and the
//! main entrance to the south, amenities in between. The outer walls box
//! the terminal in; two partition walls flank the security corridor and a
//! short wall separates the piers.

use log::info;
use serde::{Deserialize, Serialize};

use crate::db::repository::{MapRepository, RepositoryResult};
use crate::db::services;
use crate::models::{NewLocation, NewPath, NewWall};

/// (id, name, type, category, description, x, y)
type LocationSeed = (i64, &'static str, &'static str, &'static str, &'static str, f64, f64);

const LOCATIONS: &[LocationSeed] = &[
    (1, "Gate A1", "gate", "departure", "Domestic departures", 100.0, 50.0),
    (2, "Gate A2", "gate", "departure", "Domestic departures", 150.0, 50.0),
    (3, "Gate A3", "gate", "departure", "Domestic departures", 200.0, 50.0),
    (4, "Gate B1", "gate", "international", "International departures", 300.0, 50.0),
    (5, "Gate B2", "gate", "international", "International departures", 350.0, 50.0),
    (6, "Check-in A", "checkin", "service", "Domestic check-in", 150.0, 300.0),
    (7, "Check-in B", "checkin", "service", "International check-in", 300.0, 300.0),
    (8, "Security Checkpoint", "security", "service", "Security screening", 225.0, 200.0),
    (9, "Food Court", "restaurant", "food", "Multiple dining options", 175.0, 125.0),
    (10, "Coffee Shop", "restaurant", "food", "Quick coffee and snacks", 275.0, 125.0),
    (11, "Duty Free", "shop", "retail", "Tax-free shopping", 225.0, 100.0),
    (12, "Restrooms", "restroom", "service", "Public restrooms", 225.0, 150.0),
    (13, "Main Entrance", "entrance", "access", "Airport main entrance", 225.0, 350.0),
    (14, "Baggage Claim", "baggage", "service", "Luggage pickup area", 225.0, 400.0),
    (15, "Information Desk", "info", "service", "Airport information", 225.0, 275.0),
];

/// (source, destination, distance, congestion)
const PATHS: &[(i64, i64, f64, i32)] = &[
    (13, 14, 50.0, 1),
    (13, 15, 75.0, 1),
    (13, 6, 60.0, 2),
    (13, 7, 85.0, 2),
    (6, 8, 100.0, 3),
    (7, 8, 100.0, 3),
    (15, 8, 75.0, 2),
    (8, 9, 80.0, 2),
    (8, 10, 80.0, 2),
    (8, 11, 100.0, 1),
    (8, 12, 50.0, 1),
    (9, 1, 80.0, 1),
    (9, 2, 60.0, 1),
    (9, 3, 80.0, 1),
    (10, 4, 80.0, 1),
    (10, 5, 60.0, 1),
    (11, 9, 50.0, 1),
    (11, 10, 50.0, 1),
    (1, 2, 50.0, 1),
    (2, 3, 50.0, 1),
    (4, 5, 50.0, 1),
    (3, 11, 60.0, 1),
    (4, 11, 80.0, 1),
    (12, 9, 30.0, 1),
    (12, 10, 30.0, 1),
];

const WALLS: &[(f64, f64, f64, f64)] = &[
    (50.0, 25.0, 400.0, 25.0),
    (50.0, 25.0, 50.0, 425.0),
    (400.0, 25.0, 400.0, 425.0),
    (50.0, 425.0, 400.0, 425.0),
    (100.0, 180.0, 200.0, 180.0),
    (250.0, 180.0, 350.0, 180.0),
    (250.0, 25.0, 250.0, 75.0),
];

/// Counts of records written by [`populate_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub locations: usize,
    pub paths: usize,
    pub walls: usize,
}

/// Replace the current map with the sample layout.
///
/// Existing paths go first so location deletes never trip the reference
/// check.
///
/// Records are cleared and written one at a time, not in a transaction. A
/// failure part-way leaves a partial map, and concurrent readers may see
/// one while this runs. Calling it again always converges on the full
/// layout.
pub async fn populate_map<R: MapRepository + ?Sized>(repo: &R) -> RepositoryResult<SeedSummary> {
    clear_map(repo).await?;

    for &(id, name, location_type, category, description, x, y) in LOCATIONS {
        let location = NewLocation::new(name, location_type, x, y)
            .with_id(id)
            .with_category(category)
            .with_description(description);
        services::create_location(repo, location).await?;
    }

    for &(source, destination, distance, congestion) in PATHS {
        let path = NewPath::new(source, destination, distance).with_congestion(congestion);
        services::create_path(repo, path).await?;
    }

    for &(x1, y1, x2, y2) in WALLS {
        services::create_wall(repo, NewWall::new(x1, y1, x2, y2)).await?;
    }

    let summary = SeedSummary {
        locations: LOCATIONS.len(),
        paths: PATHS.len(),
        walls: WALLS.len(),
    };
    info!(
        "Seeded airport map: {} locations, {} paths, {} walls",
        summary.locations, summary.paths, summary.walls
    );
    Ok(summary)
}

async fn clear_map<R: MapRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
    for path in repo.list_paths().await? {
        repo.delete_path(path.id).await?;
    }
    for location in repo.list_locations().await? {
        repo.delete_location(location.id).await?;
    }
    for wall in repo.list_walls().await? {
        repo.delete_wall(wall.id).await?;
    }
    Ok(())
}
