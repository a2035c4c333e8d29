use crate::course::cone::{Cone, ConeType};
use crate::geo::GeoCoordinate;
use crate::prelude::IndexError;
use crate::telemetry::log::LogManager;
use tokio::sync::watch;

/// Ordered, in-progress set of tagged cones for one session.
///
/// Index is the only identity: cones are appended, the last one can be
/// removed, and rotations are edited in place. Every mutation bumps a
/// revision counter that renderers can poll or subscribe to.
pub struct ConeStore {
    cones: Vec<Cone>,
    revision: watch::Sender<u64>,
    logger: LogManager,
}

impl ConeStore {
    pub fn new() -> Self {
        Self::from_cones(Vec::new())
    }

    /// Reopens an existing course, e.g. the cones of a saved chart.
    pub fn from_cones(cones: Vec<Cone>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            cones,
            revision,
            logger: LogManager::new(),
        }
    }

    pub fn tag(&mut self, location: GeoCoordinate, cone_type: ConeType, rotation: f64) -> usize {
        self.cones.push(Cone::new(location, cone_type, rotation));
        let index = self.cones.len() - 1;
        self.logger.record(&format!(
            "cone {} tagged at {:.7}, {:.7}",
            index, location.latitude, location.longitude
        ));
        self.bump();
        index
    }

    /// Removes the highest-index cone. Does nothing on an empty store.
    pub fn delete_last(&mut self) -> Option<Cone> {
        let removed = self.cones.pop();
        if removed.is_some() {
            self.logger
                .record(&format!("last cone deleted, {} remain", self.cones.len()));
            self.bump();
        }
        removed
    }

    pub fn update_rotation(&mut self, index: usize, rotation: f64) -> Result<(), IndexError> {
        let len = self.cones.len();
        let cone = self
            .cones
            .get_mut(index)
            .ok_or_else(|| IndexError::new(index, len))?;
        cone.rotation = rotation;
        self.logger
            .debug(&format!("cone {} rotation set to {}", index, rotation));
        self.bump();
        Ok(())
    }

    pub fn clear(&mut self) {
        if !self.cones.is_empty() {
            self.cones.clear();
            self.bump();
        }
    }

    pub fn count(&self) -> usize {
        self.cones.len()
    }

    pub fn len(&self) -> usize {
        self.cones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&Cone> {
        self.cones.get(index)
    }

    pub fn cones(&self) -> &[Cone] {
        &self.cones
    }

    /// Projection reference: the first tagged cone.
    pub fn reference(&self) -> Option<GeoCoordinate> {
        self.cones.first().map(|cone| cone.location)
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that observes every revision change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl Default for ConeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConeStore {
    fn clone(&self) -> Self {
        Self::from_cones(self.cones.clone())
    }
}

impl std::fmt::Debug for ConeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConeStore")
            .field("cones", &self.cones)
            .field("revision", &self.revision())
            .finish()
    }
}
