//! Location model for geographic coordinates

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Point location for a historical query
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location. Coordinates are taken as given, see [`Location::validate`].
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both coordinates are finite and inside their geographic range.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ServiceError::validation(format!(
                "Invalid latitude {}: must be between -90 and 90",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ServiceError::validation(format!(
                "Invalid longitude {}: must be between -180 and 180",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
