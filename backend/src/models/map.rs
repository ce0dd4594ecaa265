//! Airport map entities: locations, paths and walls.
//!
//! These are the records the repositories store and the wayfinding engine
//! reads. Write models (`New*`, `*Update`) are validated by
//! [`crate::db::services`] before they reach a repository.

use serde::{Deserialize, Serialize};

use crate::algorithms::geometry::{Point, Segment};
use crate::define_id_type;

define_id_type!(i64, LocationId);
define_id_type!(i64, PathId);
define_id_type!(i64, WallId);

/// Lowest congestion value a path can carry.
pub const MIN_CONGESTION: i32 = 1;
/// Highest congestion value a path can carry.
pub const MAX_CONGESTION: i32 = 10;

fn default_congestion() -> i32 {
    MIN_CONGESTION
}

/// A named point of interest in the airport graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Open set: gate, security, lounge, checkin, restaurant, shop,
    /// restroom, entrance, baggage, info, ...
    #[serde(rename = "type")]
    pub location_type: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub coordinates: Point,
}

/// An undirected, weighted, congestion-tagged connection between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: PathId,
    pub source_id: LocationId,
    pub destination_id: LocationId,
    /// Edge weight used by the pathfinder. Always > 0 once stored.
    pub distance: f64,
    /// Crowding indicator in `[MIN_CONGESTION, MAX_CONGESTION]`.
    #[serde(default = "default_congestion")]
    pub congestion: i32,
}

impl Path {
    /// Whether this path touches the given location at either end.
    pub fn touches(&self, location_id: LocationId) -> bool {
        self.source_id == location_id || self.destination_id == location_id
    }
}

/// A static line-segment obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: WallId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Wall {
    pub fn segment(&self) -> Segment {
        Segment::new(Point::new(self.x1, self.y1), Point::new(self.x2, self.y2))
    }
}

/// Payload for creating a location.
///
/// `id` is normally left empty and assigned by the repository; the seed
/// layout supplies fixed ids so paths can reference them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    #[serde(default)]
    pub id: Option<LocationId>,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub coordinates: Point,
}

impl NewLocation {
    pub fn new(name: impl Into<String>, location_type: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            location_type: location_type.into(),
            category: None,
            description: None,
            coordinates: Point::new(x, y),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(LocationId::new(id));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Materialize the stored record once an id is known.
    pub fn into_location(self, id: LocationId) -> Location {
        Location {
            id,
            name: self.name,
            location_type: self.location_type,
            category: self.category,
            description: self.description,
            coordinates: self.coordinates,
        }
    }
}

/// Partial update of a location. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub location_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Point>,
}

impl LocationUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location_type.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.coordinates.is_none()
    }

    pub fn apply_to(&self, location: &mut Location) {
        if let Some(name) = &self.name {
            location.name = name.clone();
        }
        if let Some(location_type) = &self.location_type {
            location.location_type = location_type.clone();
        }
        if let Some(category) = &self.category {
            location.category = Some(category.clone());
        }
        if let Some(description) = &self.description {
            location.description = Some(description.clone());
        }
        if let Some(coordinates) = self.coordinates {
            location.coordinates = coordinates;
        }
    }
}

/// Payload for creating a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPath {
    pub source_id: LocationId,
    pub destination_id: LocationId,
    pub distance: f64,
    #[serde(default = "default_congestion")]
    pub congestion: i32,
}

impl NewPath {
    pub fn new(source_id: i64, destination_id: i64, distance: f64) -> Self {
        Self {
            source_id: LocationId::new(source_id),
            destination_id: LocationId::new(destination_id),
            distance,
            congestion: MIN_CONGESTION,
        }
    }

    pub fn with_congestion(mut self, congestion: i32) -> Self {
        self.congestion = congestion;
        self
    }

    pub fn into_path(self, id: PathId) -> Path {
        Path {
            id,
            source_id: self.source_id,
            destination_id: self.destination_id,
            distance: self.distance,
            congestion: self.congestion,
        }
    }
}

/// Partial update of a path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathUpdate {
    #[serde(default)]
    pub source_id: Option<LocationId>,
    #[serde(default)]
    pub destination_id: Option<LocationId>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub congestion: Option<i32>,
}

impl PathUpdate {
    pub fn apply_to(&self, path: &mut Path) {
        if let Some(source_id) = self.source_id {
            path.source_id = source_id;
        }
        if let Some(destination_id) = self.destination_id {
            path.destination_id = destination_id;
        }
        if let Some(distance) = self.distance {
            path.distance = distance;
        }
        if let Some(congestion) = self.congestion {
            path.congestion = congestion;
        }
    }
}

/// Payload for creating a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWall {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl NewWall {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn into_wall(self, id: WallId) -> Wall {
        Wall {
            id,
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }
}
