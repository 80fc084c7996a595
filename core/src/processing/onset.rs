use crate::interface::DetectionInterval;
use crate::math::stats::StatsHelper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerState {
    Idle,
    Active { start: usize },
}

/// Hysteresis level-crossing trigger over the detection trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnsetDetector {
    pub threshold_on: f32,
    pub threshold_off: f32,
}

impl OnsetDetector {
    pub fn new(threshold_on: f32, threshold_off: f32) -> Self {
        Self {
            threshold_on,
            threshold_off,
        }
    }

    /// Single-threshold detector: plain level crossing.
    pub fn level(threshold: f32) -> Self {
        Self::new(threshold, threshold)
    }

    /// Ascending, non-overlapping `(start, end)` pairs with `start < end`.
    ///
    /// A trigger still active at the final sample is closed at the last index;
    /// if that would give an empty span (trigger on the very last sample) it is
    /// dropped.
    pub fn trigger_onsets(&self, trace: &[f32]) -> Vec<(usize, usize)> {
        let mut onsets = Vec::new();
        let mut state = TriggerState::Idle;

        for (idx, &value) in trace.iter().enumerate() {
            state = match state {
                TriggerState::Idle if value >= self.threshold_on => {
                    TriggerState::Active { start: idx }
                }
                TriggerState::Active { start } if value < self.threshold_off => {
                    onsets.push((start, idx));
                    TriggerState::Idle
                }
                unchanged => unchanged,
            };
        }

        if let TriggerState::Active { start } = state {
            let last = trace.len() - 1;
            if start < last {
                onsets.push((start, last));
            }
        }

        onsets
    }

    /// Onsets paired with the mean detection probability over `[start, end)`,
    /// rounded to three decimals.
    pub fn detect(&self, trace: &[f32]) -> Vec<DetectionInterval> {
        self.trigger_onsets(trace)
            .into_iter()
            .map(|(start, end)| {
                let mean = StatsHelper::mean(&trace[start..end]).unwrap_or(0.0);
                DetectionInterval {
                    start,
                    end,
                    mean_probability: StatsHelper::round_to(mean, 3) as f32,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_crossing_yields_one_interval() {
        let trace = [0.0, 0.2, 0.6, 0.8, 0.7, 0.3, 0.1];
        assert_eq!(OnsetDetector::level(0.5).trigger_onsets(&trace), vec![(2, 5)]);
    }

    #[test]
    fn active_at_end_closes_on_last_index() {
        let trace = [0.0, 0.9, 0.9, 0.9];
        assert_eq!(OnsetDetector::level(0.5).trigger_onsets(&trace), vec![(1, 3)]);
    }

    #[test]
    fn trigger_on_final_sample_is_dropped() {
        let trace = [0.0, 0.1, 0.9];
        assert!(OnsetDetector::level(0.5).trigger_onsets(&trace).is_empty());
        assert!(OnsetDetector::level(0.5).trigger_onsets(&[]).is_empty());
    }

    #[test]
    fn hysteresis_holds_trigger_between_thresholds() {
        let trace = [0.0, 0.7, 0.4, 0.35, 0.2, 0.4, 0.7, 0.1];
        let onsets = OnsetDetector::new(0.6, 0.3).trigger_onsets(&trace);
        assert_eq!(onsets, vec![(1, 4), (6, 7)]);
    }

    #[test]
    fn intervals_are_ascending_and_disjoint() {
        let trace: Vec<f32> = (0..500)
            .map(|i| ((i as f32) * 0.07).sin().abs())
            .collect();
        let onsets = OnsetDetector::level(0.8).trigger_onsets(&trace);
        assert!(!onsets.is_empty());
        for &(start, end) in &onsets {
            assert!(start < end);
        }
        for pair in onsets.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
    }

    #[test]
    fn detect_reports_rounded_mean() {
        let trace = [0.0, 0.6, 0.7, 0.8, 0.0];
        let intervals = OnsetDetector::level(0.5).detect(&trace);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, 1);
        assert_eq!(intervals[0].end, 4);
        assert_eq!(intervals[0].mean_probability, 0.7);
    }
}
