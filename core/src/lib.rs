//! Course-geometry engine for the autocross cone mapper.
//!
//! Raw GPS fixes are gated and appended to an ordered cone store, projected
//! onto a local plane around the first cone, and normalized into screen
//! space for a zoomable, rotatable course map. Named snapshots of a course
//! persist as JSON chart collections.

pub mod chart;
pub mod course;
pub mod geo;
pub mod location;
pub mod plot;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use chart::{ChartLibrary, SavedChart};
pub use course::{Cone, ConeStore, ConeType};
pub use geo::{project, GeoCoordinate, PlanarPoint};
pub use plot::{PlotParams, PlottedCone, RenderHint, ScalingMode};
pub use prelude::{ChartError, DecodeError, IndexError, PlotError, StorageError};
pub use session::{TagOutcome, TaggingSession};
