use crate::course::Cone;
use crate::geo::GeoCoordinate;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named snapshot of a course together with its world rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedChart {
    pub name: String,
    pub cone_data: Vec<Cone>,
    pub rotation_angle: f64,
}

impl SavedChart {
    pub fn new(name: impl Into<String>, cone_data: Vec<Cone>, rotation_angle: f64) -> Self {
        Self {
            name: name.into(),
            cone_data,
            rotation_angle,
        }
    }

    /// The chart's own first cone, used as projection reference.
    pub fn reference(&self) -> Option<GeoCoordinate> {
        self.cone_data.first().map(|cone| cone.location)
    }

    pub fn is_finite(&self) -> bool {
        self.rotation_angle.is_finite() && self.cone_data.iter().all(Cone::is_finite)
    }

    /// File name used when the chart is exported on its own.
    pub fn export_file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    pub fn summary(&self) -> ChartSummary {
        ChartSummary {
            name: self.name.clone(),
            cone_count: self.cone_data.len(),
            rotation_angle: self.rotation_angle,
        }
    }
}

/// One line of the chart listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub name: String,
    pub cone_count: usize,
    pub rotation_angle: f64,
}

impl fmt::Display for ChartSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Rotation: {} - Number of Cones: {}",
            self.name, self.rotation_angle, self.cone_count
        )
    }
}

/// Default chart name for a save taken at `now`.
pub fn generate_chart_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("Chart_{}", now.format("%Y-%m-%d_%H:%M:%S"))
}
