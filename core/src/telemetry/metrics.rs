use std::sync::Mutex;

/// Counters for the outcome of asynchronous collaborator completions.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    applied: usize,
    discarded: usize,
    errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                applied: 0,
                discarded: 0,
                errors: 0,
            }),
        }
    }

    pub fn record_applied(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.applied += 1;
        }
    }

    /// A completion that lost the staleness gate (superseded or issued in a
    /// previous run).
    pub fn record_discarded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.discarded += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.applied, metrics.discarded, metrics.errors)
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_each_outcome_independently() {
        let metrics = MetricsRecorder::new();
        metrics.record_applied();
        metrics.record_applied();
        metrics.record_discarded();
        metrics.record_error();
        assert_eq!(metrics.snapshot(), (2, 1, 1));
    }
}
