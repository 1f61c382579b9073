use crate::sdk::routing::coord::Coord;
use serde::{Deserialize, Serialize};

// --- Request body for /v2/directions/driving-hgv ---

#[derive(Serialize, Debug)]
pub struct DirectionsRequest {
    pub coordinates: [[f64; 2]; 2],
    pub preference: &'static str,
    pub units: &'static str,
    pub language: &'static str,
    pub geometry: bool,
    pub instructions: bool,
    pub elevation: bool,
    pub extra_info: Vec<String>,
    pub options: DirectionsOptions,
}

#[derive(Serialize, Debug)]
pub struct DirectionsOptions {
    pub vehicle_type: &'static str,
    pub avoid_features: Vec<&'static str>,
}

impl DirectionsRequest {
    /// Shortest HGV route from `start` to `end`, ferries excluded, distance
    /// only.
    pub fn lorry(start: Coord, end: Coord) -> Self {
        Self {
            coordinates: [start.to_position(), end.to_position()],
            preference: "shortest",
            units: "m",
            language: "en",
            geometry: false,
            instructions: false,
            elevation: false,
            extra_info: Vec::new(),
            options: DirectionsOptions {
                vehicle_type: "hgv",
                avoid_features: vec!["ferries"],
            },
        }
    }
}

// --- Data Structures for parsing ORS responses ---

#[derive(Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}
#[derive(Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: DirectionsSummary,
}
// ORS leaves out zero-valued summary fields.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct DirectionsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}
