use std::sync::Mutex;

use serde::Serialize;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters accumulated over one station run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub windows: usize,
    pub emitted: usize,
    pub duplicates: usize,
    pub errors: usize,
}

impl MetricsSnapshot {
    pub fn merge(&mut self, other: &MetricsSnapshot) {
        self.windows += other.windows;
        self.emitted += other.emitted;
        self.duplicates += other.duplicates;
        self.errors += other.errors;
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_window(&self, emitted: usize, duplicates: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.windows += 1;
            metrics.emitted += emitted;
            metrics.duplicates += duplicates;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
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
    fn recorder_accumulates_windows_and_errors() {
        let recorder = MetricsRecorder::new();
        recorder.record_window(2, 1);
        recorder.record_window(0, 3);
        recorder.record_error();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.windows, 2);
        assert_eq!(snapshot.emitted, 2);
        assert_eq!(snapshot.duplicates, 4);
        assert_eq!(snapshot.errors, 1);
    }

    #[test]
    fn snapshots_merge_across_stations() {
        let mut total = MetricsSnapshot::default();
        total.merge(&MetricsSnapshot {
            windows: 3,
            emitted: 1,
            duplicates: 0,
            errors: 0,
        });
        total.merge(&MetricsSnapshot {
            windows: 2,
            emitted: 2,
            duplicates: 1,
            errors: 1,
        });
        assert_eq!(total.windows, 5);
        assert_eq!(total.emitted, 3);
        assert_eq!(total.errors, 1);
    }
}
