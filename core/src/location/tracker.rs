use crate::location::source::{Authorization, LocationEvent, LocationFix, LocationSource};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Maximum horizontal error, in metres, accepted for tagging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyGate {
    threshold_m: f64,
}

impl AccuracyGate {
    pub const DEFAULT_THRESHOLD_M: f64 = 5.0;
    pub const THRESHOLD_RANGE: RangeInclusive<f64> = 1.0..=50.0;

    /// Thresholds outside `THRESHOLD_RANGE` are clamped; NaN falls back to the default.
    pub fn new(threshold_m: f64) -> Self {
        let threshold_m = if threshold_m.is_nan() {
            Self::DEFAULT_THRESHOLD_M
        } else {
            threshold_m.clamp(*Self::THRESHOLD_RANGE.start(), *Self::THRESHOLD_RANGE.end())
        };
        Self { threshold_m }
    }

    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    pub fn accepts(&self, fix: &LocationFix) -> bool {
        fix.horizontal_accuracy_m >= 0.0 && fix.horizontal_accuracy_m <= self.threshold_m
    }
}

impl Default for AccuracyGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD_M)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsStatus {
    #[default]
    NotReady,
    Ok,
    NotAuthorized,
    Error,
}

impl fmt::Display for GpsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            GpsStatus::NotReady => "Not Ready",
            GpsStatus::Ok => "OK",
            GpsStatus::NotAuthorized => "GPS not authorized",
            GpsStatus::Error => "Error",
        };
        f.write_str(message)
    }
}

/// Keeps the latest fix and the status derived from it.
#[derive(Default)]
pub struct LocationTracker {
    latest: Option<LocationFix>,
    authorization: Authorization,
    status: GpsStatus,
    gate: AccuracyGate,
    logger: LogManager,
}

impl LocationTracker {
    pub fn new(gate: AccuracyGate) -> Self {
        Self {
            gate,
            ..Default::default()
        }
    }

    pub fn handle(&mut self, event: LocationEvent) {
        match event {
            LocationEvent::Fix(fix) => {
                self.latest = Some(fix);
                self.refresh_status();
            }
            LocationEvent::Authorization { state } => {
                self.authorization = state;
                match state {
                    Authorization::Denied | Authorization::Restricted => {
                        self.status = GpsStatus::NotAuthorized;
                        self.logger.warn("location access not authorized");
                    }
                    Authorization::Authorized | Authorization::NotDetermined => {
                        self.refresh_status();
                    }
                }
            }
            LocationEvent::Failed { message } => {
                self.status = GpsStatus::Error;
                self.logger
                    .warn(&format!("failed to update location: {}", message));
            }
        }
    }

    /// Consumes every event the source has pending. Returns how many were handled.
    pub fn drain<S>(&mut self, source: &mut S) -> usize
    where
        S: LocationSource + ?Sized,
    {
        let mut handled = 0;
        while let Some(event) = source.poll_event() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    pub fn latest(&self) -> Option<&LocationFix> {
        self.latest.as_ref()
    }

    pub fn status(&self) -> GpsStatus {
        self.status
    }

    pub fn authorization(&self) -> Authorization {
        self.authorization
    }

    pub fn is_accuracy_good(&self) -> bool {
        self.status == GpsStatus::Ok
    }

    pub fn gate(&self) -> AccuracyGate {
        self.gate
    }

    pub fn set_threshold(&mut self, threshold_m: f64) {
        self.gate = AccuracyGate::new(threshold_m);
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        if matches!(
            self.authorization,
            Authorization::Denied | Authorization::Restricted
        ) {
            self.status = GpsStatus::NotAuthorized;
            return;
        }
        self.status = match &self.latest {
            Some(fix) if self.gate.accepts(fix) => GpsStatus::Ok,
            _ => GpsStatus::NotReady,
        };
    }
}
