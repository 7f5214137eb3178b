//! Where a task is carried out.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};

/// Task location: either remote work or a physical address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskLocation {
    /// Work that can be done from anywhere.
    Remote,
    /// Work at a physical address.
    Physical {
        /// Street address.
        address: String,
        /// Latitude in decimal degrees.
        lat: f64,
        /// Longitude in decimal degrees.
        lng: f64,
    },
}

impl TaskLocation {
    /// Builds a location from loosely typed request fields.
    ///
    /// Remote locations ignore address and coordinates. Physical locations
    /// require all three.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidLocation`] when the kind is unknown,
    /// a physical field is missing, or coordinates are out of range.
    pub fn from_parts(
        kind: &str,
        address: Option<String>,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Result<Self, TaskDomainError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "physical" => {
                let location = Self::Physical {
                    address: address
                        .ok_or(TaskDomainError::InvalidLocation("address is required"))?
                        .trim()
                        .to_owned(),
                    lat: lat.ok_or(TaskDomainError::InvalidLocation("lat is required"))?,
                    lng: lng.ok_or(TaskDomainError::InvalidLocation("lng is required"))?,
                };
                location.validate()?;
                Ok(location)
            }
            _ => Err(TaskDomainError::InvalidLocation(
                "type must be remote or physical",
            )),
        }
    }

    /// Checks the location's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidLocation`] for a blank address or
    /// coordinates outside the valid latitude/longitude ranges.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        let Self::Physical { address, lat, lng } = self else {
            return Ok(());
        };
        if address.trim().is_empty() {
            return Err(TaskDomainError::InvalidLocation("address must not be empty"));
        }
        if !(-90.0..=90.0).contains(lat) {
            return Err(TaskDomainError::InvalidLocation(
                "lat must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(lng) {
            return Err(TaskDomainError::InvalidLocation(
                "lng must be between -180 and 180",
            ));
        }
        Ok(())
    }
}
