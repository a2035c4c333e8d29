use crate::generator::walk::WalkStep;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use conecore::chart::SavedChart;
use conecore::geo::GeoCoordinate;
use conecore::location::QueuedSource;
use conecore::plot::{plot_course, PlottedCone};
use conecore::session::{TagOutcome, TaggingSession};
use conecore::telemetry::Counters;

pub struct WorkflowResult {
    pub chart: SavedChart,
    pub plotted: Vec<PlottedCone>,
    pub outcomes: Vec<TagOutcome>,
    pub counters: Counters,
    pub last_location: Option<GeoCoordinate>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Replays a walk through a tagging session and snapshots the course.
    pub fn execute(&self, steps: &[WalkStep], chart_name: &str) -> anyhow::Result<WorkflowResult> {
        let mut session = TaggingSession::new(self.config.gate());
        let mut source = QueuedSource::new();
        let mut outcomes = Vec::with_capacity(steps.len());

        for step in steps {
            source.push(step.event.clone());
            session.poll(&mut source);
            session.select_type(step.cone_type.clone());
            session.set_pointer_rotation(step.rotation);
            outcomes.push(session.tag());
        }

        let chart = session.snapshot(chart_name, self.config.rotation_deg);
        let plotted = session
            .plot(self.config.to_plot_params())
            .context("plotting simulated course")?;

        Ok(WorkflowResult {
            chart,
            plotted,
            outcomes,
            counters: session.counters(),
            last_location: session.tracker().latest().map(|fix| fix.coordinate),
        })
    }

    /// Plots a stored chart with its own world rotation.
    pub fn plot_chart(&self, chart: &SavedChart) -> anyhow::Result<Vec<PlottedCone>> {
        let mut params = self.config.to_plot_params();
        params.world_rotation_deg = chart.rotation_angle;
        plot_course(&chart.cone_data, params)
            .with_context(|| format!("plotting chart {:?}", chart.name))
    }
}
