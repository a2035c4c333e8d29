use crate::chart::SavedChart;
use crate::course::{Cone, ConeStore, ConeType};
use crate::geo::distance_m;
use crate::location::{AccuracyGate, GpsStatus, LocationSource, LocationTracker};
use crate::plot::{plot_course, PlotFrame, PlotParams, PlottedCone, ScreenPoint};
use crate::prelude::{IndexError, PlotResult};
use crate::telemetry::{Counters, LogManager, SessionMetrics};

/// Result of a tag request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagOutcome {
    Tagged(usize),
    /// No fix has been delivered yet.
    NoLocation,
    NotAuthorized,
    /// The last location update failed; waits for a fresh fix.
    LocationFailed,
    AccuracyRejected { accuracy_m: f64, threshold_m: f64 },
}

impl TagOutcome {
    pub fn is_tagged(&self) -> bool {
        matches!(self, TagOutcome::Tagged(_))
    }
}

/// One in-progress course: the cone store plus the inputs that feed it.
///
/// This is the caller that applies the accuracy gate before tagging; the
/// store itself accepts whatever it is given.
pub struct TaggingSession {
    store: ConeStore,
    tracker: LocationTracker,
    selected_type: ConeType,
    pointer_rotation: f64,
    metrics: SessionMetrics,
    logger: LogManager,
}

impl TaggingSession {
    pub fn new(gate: AccuracyGate) -> Self {
        Self {
            store: ConeStore::new(),
            tracker: LocationTracker::new(gate),
            selected_type: ConeType::Single,
            pointer_rotation: 0.0,
            metrics: SessionMetrics::new(),
            logger: LogManager::new(),
        }
    }

    /// Reopens a saved chart as a live course.
    pub fn resume(chart: &SavedChart, gate: AccuracyGate) -> Self {
        let mut session = Self::new(gate);
        session.store = ConeStore::from_cones(chart.cone_data.clone());
        session
    }

    pub fn poll<S>(&mut self, source: &mut S) -> usize
    where
        S: LocationSource + ?Sized,
    {
        self.tracker.drain(source)
    }

    pub fn select_type(&mut self, cone_type: ConeType) {
        self.selected_type = cone_type;
    }

    pub fn selected_type(&self) -> &ConeType {
        &self.selected_type
    }

    /// Heading given to the next pointer cone.
    pub fn set_pointer_rotation(&mut self, rotation: f64) {
        self.pointer_rotation = rotation;
    }

    pub fn tag(&mut self) -> TagOutcome {
        let Some(fix) = self.tracker.latest().copied() else {
            self.logger.warn("no location available to tag a cone");
            self.metrics.record_rejected();
            return TagOutcome::NoLocation;
        };

        if self.tracker.status() == GpsStatus::NotAuthorized {
            self.logger.warn("location access not authorized, cone not tagged");
            self.metrics.record_rejected();
            return TagOutcome::NotAuthorized;
        }

        if self.tracker.status() == GpsStatus::Error {
            self.logger.warn("location updates failed, cone not tagged");
            self.metrics.record_rejected();
            return TagOutcome::LocationFailed;
        }

        let gate = self.tracker.gate();
        if !gate.accepts(&fix) {
            self.logger.warn(&format!(
                "GPS accuracy not sufficient to tag a cone ({:.1} m > {:.1} m)",
                fix.horizontal_accuracy_m,
                gate.threshold_m()
            ));
            self.metrics.record_rejected();
            return TagOutcome::AccuracyRejected {
                accuracy_m: fix.horizontal_accuracy_m,
                threshold_m: gate.threshold_m(),
            };
        }

        let rotation = match self.selected_type {
            ConeType::Pointer => self.pointer_rotation,
            _ => 0.0,
        };
        if let Some(previous) = self.store.cones().last() {
            self.logger.debug(&format!(
                "{:.2} m from previous cone",
                distance_m(previous.location, fix.coordinate)
            ));
        }
        let index = self
            .store
            .tag(fix.coordinate, self.selected_type.clone(), rotation);
        self.metrics.record_tagged();
        TagOutcome::Tagged(index)
    }

    pub fn delete_last(&mut self) -> Option<Cone> {
        let removed = self.store.delete_last();
        if removed.is_some() {
            self.metrics.record_deleted();
        }
        removed
    }

    pub fn update_rotation(&mut self, index: usize, rotation: f64) -> Result<(), IndexError> {
        self.store.update_rotation(index, rotation)
    }

    /// Independent copy of the current course.
    pub fn snapshot(&self, name: impl Into<String>, world_rotation_deg: f64) -> SavedChart {
        SavedChart::new(name, self.store.cones().to_vec(), world_rotation_deg)
    }

    pub fn plot(&self, params: PlotParams) -> PlotResult<Vec<PlottedCone>> {
        plot_course(self.store.cones(), params)
    }

    /// Screen position of the latest fix, when both a fix and a reference exist.
    pub fn current_position(&self, params: PlotParams) -> PlotResult<Option<ScreenPoint>> {
        let (Some(reference), Some(fix)) = (self.store.reference(), self.tracker.latest()) else {
            return Ok(None);
        };
        let frame = PlotFrame::new(self.store.cones(), reference, params)?;
        Ok(Some(frame.place(fix.coordinate)))
    }

    pub fn store(&self) -> &ConeStore {
        &self.store
    }

    pub fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut LocationTracker {
        &mut self.tracker
    }

    pub fn counters(&self) -> Counters {
        self.metrics.snapshot()
    }
}

impl Default for TaggingSession {
    fn default() -> Self {
        Self::new(AccuracyGate::default())
    }
}
