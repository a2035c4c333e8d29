pub mod source;
pub mod tracker;

pub use source::{Authorization, LocationEvent, LocationFix, LocationSource, QueuedSource};
pub use tracker::{AccuracyGate, GpsStatus, LocationTracker};
