use serde::Serialize;

use super::angle::Axis;
use crate::error::{GeotagError, Result};

/// A latitude / longitude pair in signed decimal degrees.
///
/// Constructed through [`Coordinate::new`], which rejects non-finite values
/// and values outside [-90, 90] / [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_axis(latitude, Axis::Latitude)?;
        check_axis(longitude, Axis::Longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

fn check_axis(value: f64, axis: Axis) -> Result<()> {
    if !value.is_finite() {
        return Err(GeotagError::InvalidCoordinate(format!(
            "{} is not a finite number: {value}",
            axis.name()
        )));
    }
    let limit = axis.limit();
    if !(-limit..=limit).contains(&value) {
        return Err(GeotagError::InvalidCoordinate(format!(
            "{} out of range: {value} (must be -{limit} to {limit})",
            axis.name()
        )));
    }
    Ok(())
}
