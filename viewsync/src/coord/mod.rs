//! Geographic primitives shared by the map/feed coordinator.
//!
//! These types carry positions and viewport regions between the spatial
//! view and the synchronization engine. They hold raw WGS84 degrees and
//! perform no projection math — the map widget owns that.

use std::fmt;

/// A WGS84 point (latitude/longitude in degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (positive = north).
    pub lat: f64,
    /// Longitude in degrees (positive = east).
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Rectangular viewport region described by its four edges.
///
/// Produced by the map widget on every movement tick and consumed by the
/// bounds pipeline. The engine treats bounds as opaque values — it only
/// ever compares them structurally.
///
/// # Invariant
///
/// `north >= south` and `east >= west`. This is the caller's
/// responsibility; the engine does not enforce or normalize it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    /// Northern edge latitude in degrees.
    pub north: f64,
    /// Southern edge latitude in degrees.
    pub south: f64,
    /// Eastern edge longitude in degrees.
    pub east: f64,
    /// Western edge longitude in degrees.
    pub west: f64,
}

impl MapBounds {
    /// Create new bounds from the four edges.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Get the width of the bounds in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Get the height of the bounds in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Check whether a point falls within the bounds (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lon <= self.east
            && point.lon >= self.west
    }
}

impl fmt::Display for MapBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[N{:.5} S{:.5} E{:.5} W{:.5}]",
            self.north, self.south, self.east, self.west
        )
    }
}

/// Opaque identifier of a listing shown on both the map and the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingId(pub u64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listing#{}", self.0)
    }
}
