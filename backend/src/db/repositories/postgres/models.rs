use diesel::prelude::*;

use super::schema::{locations, paths, walls};
use crate::algorithms::geometry::Point;
use crate::models::{
    Location, LocationId, LocationUpdate, NewLocation, NewPath, NewWall, Path, PathId, PathUpdate,
    Wall, WallId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LocationRow {
    pub id: i64,
    pub name: String,
    pub location_type: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub x: f64,
    pub y: f64,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: LocationId(row.id),
            name: row.name,
            location_type: row.location_type,
            category: row.category,
            description: row.description,
            coordinates: Point::new(row.x, row.y),
        }
    }
}

/// `id: None` lets the sequence assign one.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = locations)]
pub struct NewLocationRow {
    pub id: Option<i64>,
    pub name: String,
    pub location_type: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub x: f64,
    pub y: f64,
}

impl From<NewLocation> for NewLocationRow {
    fn from(location: NewLocation) -> Self {
        Self {
            id: location.id.map(|id| id.value()),
            name: location.name,
            location_type: location.location_type,
            category: location.category,
            description: location.description,
            x: location.coordinates.x,
            y: location.coordinates.y,
        }
    }
}

/// Absent fields are skipped by Diesel and keep their stored value.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = locations)]
pub struct LocationChangeset {
    pub name: Option<String>,
    pub location_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl From<LocationUpdate> for LocationChangeset {
    fn from(update: LocationUpdate) -> Self {
        Self {
            name: update.name,
            location_type: update.location_type,
            category: update.category,
            description: update.description,
            x: update.coordinates.map(|p| p.x),
            y: update.coordinates.map(|p| p.y),
        }
    }
}

impl LocationChangeset {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location_type.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.x.is_none()
            && self.y.is_none()
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = paths)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PathRow {
    pub id: i64,
    pub source_id: i64,
    pub destination_id: i64,
    pub distance: f64,
    pub congestion: i32,
}

impl From<PathRow> for Path {
    fn from(row: PathRow) -> Self {
        Path {
            id: PathId(row.id),
            source_id: LocationId(row.source_id),
            destination_id: LocationId(row.destination_id),
            distance: row.distance,
            congestion: row.congestion,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = paths)]
pub struct NewPathRow {
    pub source_id: i64,
    pub destination_id: i64,
    pub distance: f64,
    pub congestion: i32,
}

impl From<NewPath> for NewPathRow {
    fn from(path: NewPath) -> Self {
        Self {
            source_id: path.source_id.value(),
            destination_id: path.destination_id.value(),
            distance: path.distance,
            congestion: path.congestion,
        }
    }
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = paths)]
pub struct PathChangeset {
    pub source_id: Option<i64>,
    pub destination_id: Option<i64>,
    pub distance: Option<f64>,
    pub congestion: Option<i32>,
}

impl From<PathUpdate> for PathChangeset {
    fn from(update: PathUpdate) -> Self {
        Self {
            source_id: update.source_id.map(|id| id.value()),
            destination_id: update.destination_id.map(|id| id.value()),
            distance: update.distance,
            congestion: update.congestion,
        }
    }
}

impl PathChangeset {
    pub fn is_empty(&self) -> bool {
        self.source_id.is_none()
            && self.destination_id.is_none()
            && self.distance.is_none()
            && self.congestion.is_none()
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = walls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WallRow {
    pub id: i64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<WallRow> for Wall {
    fn from(row: WallRow) -> Self {
        Wall {
            id: WallId(row.id),
            x1: row.x1,
            y1: row.y1,
            x2: row.x2,
            y2: row.y2,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = walls)]
pub struct NewWallRow {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<NewWall> for NewWallRow {
    fn from(wall: NewWall) -> Self {
        Self {
            x1: wall.x1,
            y1: wall.y1,
            x2: wall.x2,
            y2: wall.y2,
        }
    }
}
