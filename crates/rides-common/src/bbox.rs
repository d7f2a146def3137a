//! Station bounding boxes.

use serde::{Deserialize, Serialize};

/// A closed numeric interval as written in the station file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// A latitude/longitude box in degrees identifying a station.
///
/// Membership is strict on every edge: a coordinate equal to a bound is
/// outside the box. The store predicate generated for a box uses the same
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub latitude_range: Range,
    pub longitude_range: Range,
}

impl BoundingBox {
    /// Create a new bounding box from latitude and longitude bounds.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            latitude_range: Range {
                min: lat_min,
                max: lat_max,
            },
            longitude_range: Range {
                min: lon_min,
                max: lon_max,
            },
        }
    }

    pub fn lat_min(&self) -> f64 {
        self.latitude_range.min
    }

    pub fn lat_max(&self) -> f64 {
        self.latitude_range.max
    }

    pub fn lon_min(&self) -> f64 {
        self.longitude_range.min
    }

    pub fn lon_max(&self) -> f64 {
        self.longitude_range.max
    }

    /// Check if a point lies strictly inside this box.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat > self.lat_min() && lat < self.lat_max() && lon > self.lon_min() && lon < self.lon_max()
    }

    /// Bounds in placeholder binding order: lat_min, lat_max, lon_min, lon_max.
    pub fn bind_values(&self) -> [f64; 4] {
        [self.lat_min(), self.lat_max(), self.lon_min(), self.lon_max()]
    }

    /// Reject boxes that no coordinate could ever fall inside.
    pub fn validate(&self) -> Result<(), BboxError> {
        let values = self.bind_values();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(BboxError::NonFinite);
        }
        if self.lat_min() >= self.lat_max() {
            return Err(BboxError::EmptyRange {
                axis: "latitude",
                min: self.lat_min(),
                max: self.lat_max(),
            });
        }
        if self.lon_min() >= self.lon_max() {
            return Err(BboxError::EmptyRange {
                axis: "longitude",
                min: self.lon_min(),
                max: self.lon_max(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxError {
    #[error("Bounding box contains a non-finite coordinate")]
    NonFinite,

    #[error("Empty {axis} range: min {min} must be below max {max}")]
    EmptyRange {
        axis: &'static str,
        min: f64,
        max: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dock() -> BoundingBox {
        BoundingBox::new(34.04, 34.05, -118.26, -118.25)
    }

    #[test]
    fn test_contains_interior_point() {
        assert!(dock().contains(34.045, -118.255));
    }

    #[test]
    fn test_edges_are_excluded() {
        let b = dock();
        assert!(!b.contains(34.04, -118.255));
        assert!(!b.contains(34.05, -118.255));
        assert!(!b.contains(34.045, -118.26));
        assert!(!b.contains(34.045, -118.25));
    }

    #[test]
    fn test_bind_order() {
        assert_eq!(dock().bind_values(), [34.04, 34.05, -118.26, -118.25]);
    }

    #[test]
    fn test_validate() {
        assert!(dock().validate().is_ok());
        assert!(matches!(
            BoundingBox::new(1.0, 1.0, 0.0, 1.0).validate(),
            Err(BboxError::EmptyRange { axis: "latitude", .. })
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 1.0, 2.0, 1.0).validate(),
            Err(BboxError::EmptyRange { axis: "longitude", .. })
        ));
        assert!(matches!(
            BoundingBox::new(f64::NAN, 1.0, 0.0, 1.0).validate(),
            Err(BboxError::NonFinite)
        ));
    }
}
