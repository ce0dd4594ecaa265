//! Wall repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewWall, Wall, WallId};

/// Storage for static obstacles.
#[async_trait]
pub trait WallRepository: Send + Sync {
    /// All walls, ordered by id.
    async fn list_walls(&self) -> RepositoryResult<Vec<Wall>>;

    async fn get_wall(&self, id: WallId) -> RepositoryResult<Wall>;

    async fn create_wall(&self, wall: NewWall) -> RepositoryResult<Wall>;

    async fn delete_wall(&self, id: WallId) -> RepositoryResult<Wall>;
}
