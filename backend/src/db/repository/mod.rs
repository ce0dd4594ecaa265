//! Repository traits for the airport map.
//!
//! The map is split into three stores (locations, paths, walls). Callers
//! that need all of them take a [`MapRepository`], which every type
//! implementing the three traits gets for free.

pub mod error;
pub mod location;
pub mod path;
pub mod wall;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use location::LocationRepository;
pub use path::PathRepository;
pub use wall::WallRepository;

/// Composite of every map store.
pub trait MapRepository: LocationRepository + PathRepository + WallRepository {}

impl<T> MapRepository for T where T: LocationRepository + PathRepository + WallRepository {}
