pub mod coordinate;
pub mod projection;

pub use coordinate::{GeoCoordinate, PlanarPoint};
pub use projection::{distance_m, project, METERS_PER_DEGREE};
