//! Service layer for map CRUD.
//!
//! These functions enforce the map invariants before anything reaches a
//! repository: name length, finite coordinates, positive distances,
//! congestion range and referential integrity between paths and
//! locations. They work with any [`MapRepository`] implementation.

use log::info;

use super::repository::{ErrorContext, MapRepository, RepositoryError, RepositoryResult};
use crate::models::{
    Location, LocationId, LocationUpdate, NewLocation, NewPath, NewWall, Path, PathId, PathUpdate,
    Wall, WallId, MAX_CONGESTION, MIN_CONGESTION,
};

/// Maximum location name length, in characters.
pub const MAX_NAME_LEN: usize = 100;

fn invalid(operation: &str, entity: &str, message: impl Into<String>) -> RepositoryError {
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new(operation).with_entity(entity),
    )
}

fn validate_name(operation: &str, name: &str) -> RepositoryResult<()> {
    let len = name.trim().chars().count();
    if len == 0 || name.chars().count() > MAX_NAME_LEN {
        return Err(invalid(
            operation,
            "location",
            format!("Location name must be 1-{} characters", MAX_NAME_LEN),
        ));
    }
    Ok(())
}

fn validate_location_type(operation: &str, location_type: &str) -> RepositoryResult<()> {
    if location_type.trim().is_empty() {
        return Err(invalid(operation, "location", "Location type must not be empty"));
    }
    Ok(())
}

fn validate_coordinate(operation: &str, entity: &str, label: &str, value: f64) -> RepositoryResult<()> {
    if !value.is_finite() {
        return Err(invalid(
            operation,
            entity,
            format!("Coordinate {} must be a finite number", label),
        ));
    }
    Ok(())
}

fn validate_distance(operation: &str, distance: f64) -> RepositoryResult<()> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(invalid(
            operation,
            "path",
            format!("Path distance must be a positive number, got {}", distance),
        ));
    }
    Ok(())
}

fn validate_congestion(operation: &str, congestion: i32) -> RepositoryResult<()> {
    if !(MIN_CONGESTION..=MAX_CONGESTION).contains(&congestion) {
        return Err(invalid(
            operation,
            "path",
            format!(
                "Congestion must be between {} and {}, got {}",
                MIN_CONGESTION, MAX_CONGESTION, congestion
            ),
        ));
    }
    Ok(())
}

/// Dangling references are a client error, not a missing resource.
async fn ensure_location_exists<R: MapRepository + ?Sized>(
    repo: &R,
    operation: &str,
    role: &str,
    id: LocationId,
) -> RepositoryResult<()> {
    match repo.get_location(id).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => Err(RepositoryError::validation_with_context(
            format!("{} location {} does not exist", role, id),
            ErrorContext::new(operation)
                .with_entity("path")
                .with_details(format!("{}_id={}", role.to_lowercase(), id)),
        )),
        Err(e) => Err(e),
    }
}

// =========================================================
// Locations
// =========================================================

pub async fn create_location<R: MapRepository + ?Sized>(
    repo: &R,
    location: NewLocation,
) -> RepositoryResult<Location> {
    const OP: &str = "create_location";
    validate_name(OP, &location.name)?;
    validate_location_type(OP, &location.location_type)?;
    validate_coordinate(OP, "location", "x", location.coordinates.x)?;
    validate_coordinate(OP, "location", "y", location.coordinates.y)?;

    let created = repo.create_location(location).await?;
    info!(
        "Created location {} '{}' ({})",
        created.id, created.name, created.location_type
    );
    Ok(created)
}

pub async fn update_location<R: MapRepository + ?Sized>(
    repo: &R,
    id: LocationId,
    update: LocationUpdate,
) -> RepositoryResult<Location> {
    const OP: &str = "update_location";
    if let Some(name) = &update.name {
        validate_name(OP, name)?;
    }
    if let Some(location_type) = &update.location_type {
        validate_location_type(OP, location_type)?;
    }
    if let Some(coordinates) = update.coordinates {
        validate_coordinate(OP, "location", "x", coordinates.x)?;
        validate_coordinate(OP, "location", "y", coordinates.y)?;
    }

    let updated = repo.update_location(id, update).await?;
    info!("Updated location {}", updated.id);
    Ok(updated)
}

/// Delete a location that no path references.
pub async fn delete_location<R: MapRepository + ?Sized>(
    repo: &R,
    id: LocationId,
) -> RepositoryResult<Location> {
    // Surface NotFound before the reference check.
    repo.get_location(id).await?;

    let referencing = repo
        .list_paths()
        .await?
        .iter()
        .filter(|path| path.touches(id))
        .count();
    if referencing > 0 {
        return Err(RepositoryError::validation_with_context(
            format!(
                "Location {} is referenced by {} path(s); delete them first",
                id, referencing
            ),
            ErrorContext::new("delete_location")
                .with_entity("location")
                .with_entity_id(id),
        ));
    }

    let deleted = repo.delete_location(id).await?;
    info!("Deleted location {} '{}'", deleted.id, deleted.name);
    Ok(deleted)
}

// =========================================================
// Paths
// =========================================================

pub async fn create_path<R: MapRepository + ?Sized>(
    repo: &R,
    path: NewPath,
) -> RepositoryResult<Path> {
    const OP: &str = "create_path";
    validate_distance(OP, path.distance)?;
    validate_congestion(OP, path.congestion)?;
    ensure_location_exists(repo, OP, "Source", path.source_id).await?;
    ensure_location_exists(repo, OP, "Destination", path.destination_id).await?;

    let created = repo.create_path(path).await?;
    info!(
        "Created path {} ({} <-> {}, distance {})",
        created.id, created.source_id, created.destination_id, created.distance
    );
    Ok(created)
}

pub async fn update_path<R: MapRepository + ?Sized>(
    repo: &R,
    id: PathId,
    update: PathUpdate,
) -> RepositoryResult<Path> {
    const OP: &str = "update_path";
    if let Some(distance) = update.distance {
        validate_distance(OP, distance)?;
    }
    if let Some(congestion) = update.congestion {
        validate_congestion(OP, congestion)?;
    }
    if let Some(source_id) = update.source_id {
        ensure_location_exists(repo, OP, "Source", source_id).await?;
    }
    if let Some(destination_id) = update.destination_id {
        ensure_location_exists(repo, OP, "Destination", destination_id).await?;
    }

    let updated = repo.update_path(id, update).await?;
    info!("Updated path {}", updated.id);
    Ok(updated)
}

pub async fn delete_path<R: MapRepository + ?Sized>(repo: &R, id: PathId) -> RepositoryResult<Path> {
    let deleted = repo.delete_path(id).await?;
    info!("Deleted path {}", deleted.id);
    Ok(deleted)
}

// =========================================================
// Walls
// =========================================================

/// Create a wall. Zero-length walls are accepted and act as point obstacles.
pub async fn create_wall<R: MapRepository + ?Sized>(
    repo: &R,
    wall: NewWall,
) -> RepositoryResult<Wall> {
    const OP: &str = "create_wall";
    validate_coordinate(OP, "wall", "x1", wall.x1)?;
    validate_coordinate(OP, "wall", "y1", wall.y1)?;
    validate_coordinate(OP, "wall", "x2", wall.x2)?;
    validate_coordinate(OP, "wall", "y2", wall.y2)?;

    let created = repo.create_wall(wall).await?;
    info!(
        "Created wall {} ({}, {}) - ({}, {})",
        created.id, created.x1, created.y1, created.x2, created.y2
    );
    Ok(created)
}

pub async fn delete_wall<R: MapRepository + ?Sized>(repo: &R, id: WallId) -> RepositoryResult<Wall> {
    let deleted = repo.delete_wall(id).await?;
    info!("Deleted wall {}", deleted.id);
    Ok(deleted)
}
