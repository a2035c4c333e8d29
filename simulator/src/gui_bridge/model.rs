use conecore::chart::{ChartSummary, SavedChart};
use conecore::geo::GeoCoordinate;
use conecore::plot::PlottedCone;
use serde::{Deserialize, Serialize};

/// State published to the plot viewer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub chart: Option<SavedChart>,
    pub plotted: Vec<PlottedCone>,
    pub charts: Vec<ChartSummary>,
    pub current_location: Option<GeoCoordinate>,
    pub status: String,
}

impl VisualizationModel {
    pub fn new(chart: SavedChart, plotted: Vec<PlottedCone>, charts: Vec<ChartSummary>) -> Self {
        let status = format!("{}: {} cones", chart.name, chart.cone_data.len());
        Self {
            chart: Some(chart),
            plotted,
            charts,
            current_location: None,
            status,
        }
    }

    pub fn with_location(mut self, location: Option<GeoCoordinate>) -> Self {
        self.current_location = location;
        self
    }
}
