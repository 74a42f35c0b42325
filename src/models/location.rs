//! Geographic point model for trip endpoints

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

use crate::validation::{LATITUDE_RANGE, LONGITUDE_RANGE, parse_coordinate};
use crate::{Result, TaxiFareError};

/// A validated latitude/longitude pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !LATITUDE_RANGE.contains(&latitude) {
            return Err(TaxiFareError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !longitude.is_finite() || !LONGITUDE_RANGE.contains(&longitude) {
            return Err(TaxiFareError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a point from raw form strings; `label` prefixes field names in errors
    pub fn from_strings(label: &str, latitude: &str, longitude: &str) -> Result<Self> {
        let latitude = parse_coordinate(&format!("{label} latitude"), latitude, &LATITUDE_RANGE)?;
        let longitude =
            parse_coordinate(&format!("{label} longitude"), longitude, &LONGITUDE_RANGE)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to `other` in kilometres
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance(
            HaversineLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            HaversineLocation {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            Units::Kilometers,
        )
    }

    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
