//! Storage for the airport map.
//!
//! Provides abstractions for database operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, map service)              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Validation               │
//! │  - Name, coordinate, distance and congestion checks     │
//! │  - Referential integrity between paths and locations    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │                              │
//! ┌───▼────────────┐   ┌─────────────▼──────┐
//! │ Local          │   │ Postgres (Diesel)  │
//! │ (in-memory)    │   │ feature-gated      │
//! └────────────────┘   └────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use airnav::db::{services, RepositoryFactory};
//! use airnav::models::NewLocation;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     services::create_location(repo.as_ref(), NewLocation::new("Gate A1", "gate", 100.0, 50.0))
//!         .await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, LocationRepository, MapRepository, PathRepository, RepositoryError,
    RepositoryResult, WallRepository,
};
