//! Site model.
//!
//! A site is a geographically located serving region (datacenter, point of
//! presence) with a grid carbon intensity and a hardware capacity budget
//! per period.
//!
//! # Reference
//! Radovanović et al. (2023), "Carbon-Aware Computing for Datacenters"

use serde::{Deserialize, Serialize};

/// A serving site.
///
/// Accepts both descriptive field names and the terse config keys
/// (`Iv`, `Hv`, `lat`, `lon`) on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique site name.
    pub name: String,
    /// Carbon intensity of the local grid (CO2e mass per unit energy).
    #[serde(alias = "Iv")]
    pub carbon_intensity: f64,
    /// Compute capacity units available per period.
    #[serde(alias = "Hv")]
    pub hardware_capacity: f64,
    /// Latitude in degrees (presentation only, not used by the engine).
    #[serde(default, alias = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (presentation only, not used by the engine).
    #[serde(default, alias = "lon")]
    pub longitude: f64,
}

impl Site {
    /// Creates a site with the given carbon intensity and hardware capacity.
    pub fn new(name: impl Into<String>, carbon_intensity: f64, hardware_capacity: f64) -> Self {
        Self {
            name: name.into(),
            carbon_intensity,
            hardware_capacity,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// Sets the map coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}
