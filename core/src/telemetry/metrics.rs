use std::sync::Mutex;

/// Counters for one tagging session.
pub struct SessionMetrics {
    inner: Mutex<Counters>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub tagged: usize,
    pub rejected: usize,
    pub deleted: usize,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_tagged(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.tagged += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.rejected += 1;
        }
    }

    pub fn record_deleted(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.deleted += 1;
        }
    }

    pub fn snapshot(&self) -> Counters {
        if let Ok(counters) = self.inner.lock() {
            *counters
        } else {
            Counters::default()
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
