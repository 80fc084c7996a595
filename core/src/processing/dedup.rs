use chrono::{DateTime, Utc};

/// Events starting closer than this to an already emitted event are duplicates.
pub const DUPLICATE_TOLERANCE_SECS: f64 = 2.0;

/// Start times of every event emitted so far for one station.
///
/// The ledger only grows during a station run and is dropped (or
/// [`reset`](EmittedLedger::reset)) when the next station begins.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedLedger {
    entries: Vec<DateTime<Utc>>,
    tolerance_secs: f64,
}

impl Default for EmittedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl EmittedLedger {
    pub fn new() -> Self {
        Self::with_tolerance(DUPLICATE_TOLERANCE_SECS)
    }

    pub fn with_tolerance(tolerance_secs: f64) -> Self {
        Self {
            entries: Vec::new(),
            tolerance_secs,
        }
    }

    /// True if an emitted event starts within the tolerance of `start`.
    pub fn is_duplicate(&self, start: DateTime<Utc>) -> bool {
        self.entries.iter().any(|&seen| {
            let gap = (seen - start).num_microseconds().map_or(f64::INFINITY, |us| {
                (us as f64 / 1_000_000.0).abs()
            });
            gap < self.tolerance_secs
        })
    }

    /// Records `start` and returns `true` unless it duplicates an earlier event.
    pub fn admit(&mut self, start: DateTime<Utc>) -> bool {
        if self.is_duplicate(start) {
            return false;
        }
        self.entries.push(start);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DateTime<Utc>] {
        &self.entries
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
