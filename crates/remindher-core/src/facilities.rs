use serde::{Deserialize, Serialize};

/// A geocoded search origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable place name reported by the geocoder.
    pub display_name: String,
}

/// A healthcare facility near the search origin, normalized from a raw
/// provider record.
///
/// A `Facility` always has a non-empty `name` and a resolved location:
/// neither `latitude` nor `longitude` is `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Provider element ID, stored as a string to avoid precision loss.
    pub id: String,
    pub name: String,
    /// Comma-joined street address, or `"Address not available"`.
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Raw OSM `opening_hours` expression, e.g. `"Mo-Sa 09:00-18:00"`.
    pub opening_hours: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}
