//! Path repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewPath, Path, PathId, PathUpdate};

/// Storage for the walkable connections between locations.
#[async_trait]
pub trait PathRepository: Send + Sync {
    /// All paths, ordered by id.
    async fn list_paths(&self) -> RepositoryResult<Vec<Path>>;

    async fn get_path(&self, id: PathId) -> RepositoryResult<Path>;

    async fn create_path(&self, path: NewPath) -> RepositoryResult<Path>;

    async fn update_path(&self, id: PathId, update: PathUpdate) -> RepositoryResult<Path>;

    async fn delete_path(&self, id: PathId) -> RepositoryResult<Path>;

    /// Persist new congestion values for a batch of paths.
    ///
    /// The batch lands atomically. Ids that no longer exist (deleted since the
    /// caller listed them) are skipped.
    ///
    /// # Returns
    /// * `Ok(Vec<PathId>)` - Ids actually written, in input order
    async fn update_path_congestion(
        &self,
        updates: &[(PathId, i32)],
    ) -> RepositoryResult<Vec<PathId>>;
}
