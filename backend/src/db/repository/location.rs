//! Location repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Location, LocationId, LocationUpdate, NewLocation};

/// Storage for airport locations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Check if the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All locations, ordered by id.
    async fn list_locations(&self) -> RepositoryResult<Vec<Location>>;

    /// Fetch one location.
    ///
    /// # Errors
    /// `NotFound` if no location has this id.
    async fn get_location(&self, id: LocationId) -> RepositoryResult<Location>;

    /// Insert a location, assigning an id unless one is supplied.
    ///
    /// An explicit id that already exists is rejected with `ValidationError`.
    async fn create_location(&self, location: NewLocation) -> RepositoryResult<Location>;

    /// Apply a partial update and return the stored result.
    async fn update_location(
        &self,
        id: LocationId,
        update: LocationUpdate,
    ) -> RepositoryResult<Location>;

    /// Remove a location and return it.
    ///
    /// Referential checks against paths are the caller's job; see
    /// [`crate::db::services::delete_location`].
    async fn delete_location(&self, id: LocationId) -> RepositoryResult<Location>;
}
