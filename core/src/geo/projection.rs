//! Equirectangular local projection.
//!
//! Valid for course-scale extents around the reference point. The metres per
//! degree constant is a fixed approximation: no ellipsoidal correction and no
//! antimeridian handling.

use super::coordinate::{GeoCoordinate, PlanarPoint};

/// Metres per degree of latitude.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Mean Earth radius used by [`distance_m`].
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Projects `point` onto the plane tangent at `reference`.
pub fn project(point: GeoCoordinate, reference: GeoCoordinate) -> PlanarPoint {
    let dy = (point.latitude - reference.latitude) * METERS_PER_DEGREE;
    let dx = (point.longitude - reference.longitude)
        * METERS_PER_DEGREE
        * reference.latitude.to_radians().cos();
    PlanarPoint::new(dx, dy)
}

/// Great-circle distance between two coordinates in metres (haversine).
pub fn distance_m(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}
