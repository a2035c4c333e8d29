use crate::geo::GeoCoordinate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One position report from the location collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: GeoCoordinate,
    pub horizontal_accuracy_m: f64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64, horizontal_accuracy_m: f64) -> Self {
        Self {
            coordinate: GeoCoordinate::new(latitude, longitude),
            horizontal_accuracy_m,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authorization {
    #[default]
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LocationEvent {
    Fix(LocationFix),
    Authorization { state: Authorization },
    Failed { message: String },
}

/// Polling contract for a location collaborator.
///
/// The core never calls sensor APIs; it drains whatever events the source
/// has delivered since the last poll.
pub trait LocationSource {
    fn poll_event(&mut self) -> Option<LocationEvent>;
}

/// Source backed by a queue of pre-recorded or pushed events.
#[derive(Debug, Default, Clone)]
pub struct QueuedSource {
    events: VecDeque<LocationEvent>,
}

impl QueuedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: LocationEvent) {
        self.events.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl FromIterator<LocationEvent> for QueuedSource {
    fn from_iter<I: IntoIterator<Item = LocationEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl LocationSource for QueuedSource {
    fn poll_event(&mut self) -> Option<LocationEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_source_is_fifo() {
        let mut source: QueuedSource = [
            LocationEvent::Fix(LocationFix::new(1.0, 2.0, 3.0)),
            LocationEvent::Failed {
                message: "lost".into(),
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(source.pending(), 2);
        assert!(matches!(source.poll_event(), Some(LocationEvent::Fix(_))));
        assert!(matches!(source.poll_event(), Some(LocationEvent::Failed { .. })));
        assert!(source.poll_event().is_none());
    }

    #[test]
    fn events_have_tagged_json() {
        let json = serde_json::to_value(LocationEvent::Authorization {
            state: Authorization::Denied,
        })
        .unwrap();
        assert_eq!(json["event"], "authorization");
        assert_eq!(json["state"], "denied");
    }
}
