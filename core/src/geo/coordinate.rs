use serde::{Deserialize, Serialize};

/// Geodetic position in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Local planar offset in metres, x towards east and y towards north.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const ORIGIN: PlanarPoint = PlanarPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the reference point.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_is_euclidean() {
        assert_eq!(PlanarPoint::new(3.0, 4.0).magnitude(), 5.0);
        assert_eq!(PlanarPoint::ORIGIN.magnitude(), 0.0);
    }

    #[test]
    fn non_finite_coordinates_are_flagged() {
        assert!(GeoCoordinate::new(40.0, -75.0).is_finite());
        assert!(!GeoCoordinate::new(f64::NAN, -75.0).is_finite());
    }
}
