use serde::{Deserialize, Serialize};
use std::fmt;

/// One axis of a geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Axis order of a position on the ORS wire. ORS follows GeoJSON, so
/// longitude comes first. Every position sent to the provider goes through
/// [`Coord::to_position`], which reads this constant.
pub const ORS_AXIS_ORDER: [Axis; 2] = [Axis::Longitude, Axis::Latitude];

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coord {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Latitude => self.latitude,
            Axis::Longitude => self.longitude,
        }
    }

    /// The `[x, y]` pair the provider expects.
    pub fn to_position(&self) -> [f64; 2] {
        ORS_AXIS_ORDER.map(|axis| self.axis(axis))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
