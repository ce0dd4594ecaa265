//! In-memory repository for local development and tests.
//!
//! All three stores live behind a single lock, so a batch congestion update
//! and a concurrent navigation read always see a consistent map.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, LocationRepository, PathRepository, RepositoryError, RepositoryResult,
    WallRepository,
};
use crate::models::{
    Location, LocationId, LocationUpdate, NewLocation, NewPath, NewWall, Path, PathId, PathUpdate,
    Wall, WallId,
};

#[derive(Debug)]
struct LocalData {
    locations: BTreeMap<LocationId, Location>,
    paths: BTreeMap<PathId, Path>,
    walls: BTreeMap<WallId, Wall>,
    next_location_id: i64,
    next_path_id: i64,
    next_wall_id: i64,
    healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            locations: BTreeMap::new(),
            paths: BTreeMap::new(),
            walls: BTreeMap::new(),
            next_location_id: 1,
            next_path_id: 1,
            next_wall_id: 1,
            healthy: true,
        }
    }
}

impl LocalData {
    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository marked unhealthy",
                ErrorContext::new(operation).retryable(),
            ))
        }
    }

    /// Callers hold the write lock, the same one `delete_location` takes.
    fn ensure_endpoint(
        &self,
        operation: &str,
        role: &str,
        id: LocationId,
    ) -> RepositoryResult<()> {
        if self.locations.contains_key(&id) {
            return Ok(());
        }
        Err(RepositoryError::validation_with_context(
            format!("{} location {} does not exist", role, id),
            ErrorContext::new(operation)
                .with_entity("path")
                .with_details(format!("{}_id={}", role.to_lowercase(), id)),
        ))
    }

    fn ensure_endpoints(&self, operation: &str, path: &Path) -> RepositoryResult<()> {
        self.ensure_endpoint(operation, "Source", path.source_id)?;
        self.ensure_endpoint(operation, "Destination", path.destination_id)
    }
}

/// In-memory map repository.
///
/// Cloning shares the underlying store.
#[derive(Clone, Debug, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the simulated connectivity state.
    ///
    /// While unhealthy, `health_check` reports `false` and every other
    /// operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().healthy = healthy;
    }

    /// Drop every record and reset id counters.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let healthy = data.healthy;
        *data = LocalData {
            healthy,
            ..Default::default()
        };
    }

    pub fn location_count(&self) -> usize {
        self.data.read().locations.len()
    }

    pub fn path_count(&self) -> usize {
        self.data.read().paths.len()
    }

    pub fn wall_count(&self) -> usize {
        self.data.read().walls.len()
    }
}

fn not_found(entity: &str, operation: &str, id: impl ToString) -> RepositoryError {
    let id = id.to_string();
    RepositoryError::not_found_with_context(
        format!("{} {} not found", capitalize(entity), id),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl LocationRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().healthy)
    }

    async fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        let data = self.data.read();
        data.ensure_healthy("list_locations")?;
        Ok(data.locations.values().cloned().collect())
    }

    async fn get_location(&self, id: LocationId) -> RepositoryResult<Location> {
        let data = self.data.read();
        data.ensure_healthy("get_location")?;
        data.locations
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("location", "get_location", id))
    }

    async fn create_location(&self, location: NewLocation) -> RepositoryResult<Location> {
        let mut data = self.data.write();
        data.ensure_healthy("create_location")?;

        let id = match location.id {
            Some(id) => {
                if data.locations.contains_key(&id) {
                    return Err(RepositoryError::validation_with_context(
                        format!("Location {} already exists", id),
                        ErrorContext::new("create_location")
                            .with_entity("location")
                            .with_entity_id(id),
                    ));
                }
                data.next_location_id = data.next_location_id.max(id.value() + 1);
                id
            }
            None => {
                let id = LocationId::new(data.next_location_id);
                data.next_location_id += 1;
                id
            }
        };

        let stored = location.into_location(id);
        data.locations.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_location(
        &self,
        id: LocationId,
        update: LocationUpdate,
    ) -> RepositoryResult<Location> {
        let mut data = self.data.write();
        data.ensure_healthy("update_location")?;
        let location = data
            .locations
            .get_mut(&id)
            .ok_or_else(|| not_found("location", "update_location", id))?;
        update.apply_to(location);
        Ok(location.clone())
    }

    async fn delete_location(&self, id: LocationId) -> RepositoryResult<Location> {
        let mut data = self.data.write();
        data.ensure_healthy("delete_location")?;
        if !data.locations.contains_key(&id) {
            return Err(not_found("location", "delete_location", id));
        }

        let referencing = data.paths.values().filter(|path| path.touches(id)).count();
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

        data.locations
            .remove(&id)
            .ok_or_else(|| not_found("location", "delete_location", id))
    }
}

#[async_trait]
impl PathRepository for LocalRepository {
    async fn list_paths(&self) -> RepositoryResult<Vec<Path>> {
        let data = self.data.read();
        data.ensure_healthy("list_paths")?;
        Ok(data.paths.values().cloned().collect())
    }

    async fn get_path(&self, id: PathId) -> RepositoryResult<Path> {
        let data = self.data.read();
        data.ensure_healthy("get_path")?;
        data.paths
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("path", "get_path", id))
    }

    async fn create_path(&self, path: NewPath) -> RepositoryResult<Path> {
        let mut data = self.data.write();
        data.ensure_healthy("create_path")?;
        let id = PathId::new(data.next_path_id);
        let stored = path.into_path(id);
        data.ensure_endpoints("create_path", &stored)?;
        data.next_path_id += 1;
        data.paths.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_path(&self, id: PathId, update: PathUpdate) -> RepositoryResult<Path> {
        let mut data = self.data.write();
        data.ensure_healthy("update_path")?;
        let mut path = data
            .paths
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("path", "update_path", id))?;
        update.apply_to(&mut path);
        data.ensure_endpoints("update_path", &path)?;
        data.paths.insert(id, path.clone());
        Ok(path)
    }

    async fn delete_path(&self, id: PathId) -> RepositoryResult<Path> {
        let mut data = self.data.write();
        data.ensure_healthy("delete_path")?;
        data.paths
            .remove(&id)
            .ok_or_else(|| not_found("path", "delete_path", id))
    }

    async fn update_path_congestion(
        &self,
        updates: &[(PathId, i32)],
    ) -> RepositoryResult<Vec<PathId>> {
        let mut data = self.data.write();
        data.ensure_healthy("update_path_congestion")?;

        let mut written = Vec::with_capacity(updates.len());
        for (id, congestion) in updates {
            if let Some(path) = data.paths.get_mut(id) {
                path.congestion = *congestion;
                written.push(*id);
            }
        }
        Ok(written)
    }
}

#[async_trait]
impl WallRepository for LocalRepository {
    async fn list_walls(&self) -> RepositoryResult<Vec<Wall>> {
        let data = self.data.read();
        data.ensure_healthy("list_walls")?;
        Ok(data.walls.values().cloned().collect())
    }

    async fn get_wall(&self, id: WallId) -> RepositoryResult<Wall> {
        let data = self.data.read();
        data.ensure_healthy("get_wall")?;
        data.walls
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("wall", "get_wall", id))
    }

    async fn create_wall(&self, wall: NewWall) -> RepositoryResult<Wall> {
        let mut data = self.data.write();
        data.ensure_healthy("create_wall")?;
        let id = WallId::new(data.next_wall_id);
        data.next_wall_id += 1;
        let stored = wall.into_wall(id);
        data.walls.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_wall(&self, id: WallId) -> RepositoryResult<Wall> {
        let mut data = self.data.write();
        data.ensure_healthy("delete_wall")?;
        data.walls
            .remove(&id)
            .ok_or_else(|| not_found("wall", "delete_wall", id))
    }
}
