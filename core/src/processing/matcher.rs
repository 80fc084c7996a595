use crate::interface::{DetectionInterval, EventMatch, Peak};

/// Detections shorter than this many samples are ignored.
pub const MIN_DETECTION_SAMPLES: usize = 10;
/// P picks may precede the detection onset by less than this many samples.
pub const P_LOOKBACK_SAMPLES: usize = 100;
/// P picks must precede the selected S pick by more than this many samples.
pub const S_GUARD_SAMPLES: usize = 10;

/// Pairs each detection interval with at most one S and one P pick.
///
/// S is chosen first as the earliest S peak strictly inside the detection.
/// The P search then runs from `P_LOOKBACK_SAMPLES` before the onset up to
/// `S_GUARD_SAMPLES` before that S pick (or the detection end when there is no
/// S), keeping the most probable P peak with non-zero probability; the
/// earliest wins a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseMatcher {
    pub min_duration: usize,
    pub p_lookback: usize,
    pub s_guard: usize,
}

impl Default for PhaseMatcher {
    fn default() -> Self {
        Self {
            min_duration: MIN_DETECTION_SAMPLES,
            p_lookback: P_LOOKBACK_SAMPLES,
            s_guard: S_GUARD_SAMPLES,
        }
    }
}

impl PhaseMatcher {
    /// One [`EventMatch`] per interval that yields a pick, in interval order.
    ///
    /// Peak slices must be sorted ascending by sample.
    pub fn match_events(
        &self,
        detections: &[DetectionInterval],
        p_peaks: &[Peak],
        s_peaks: &[Peak],
    ) -> Vec<EventMatch> {
        detections
            .iter()
            .filter(|interval| interval.duration() >= self.min_duration)
            .filter_map(|interval| {
                let s = self.select_s(interval, s_peaks);
                let p = self.select_p(interval, s.as_ref(), p_peaks);
                EventMatch::new(interval, p, s)
            })
            .collect()
    }

    fn select_s(&self, interval: &DetectionInterval, s_peaks: &[Peak]) -> Option<Peak> {
        s_peaks
            .iter()
            .find(|peak| peak.sample > interval.start && peak.sample < interval.end)
            .copied()
    }

    fn select_p(
        &self,
        interval: &DetectionInterval,
        s: Option<&Peak>,
        p_peaks: &[Peak],
    ) -> Option<Peak> {
        // Bounds are exclusive on both sides; written additively to stay unsigned.
        let after_lower = |sample: usize| sample + self.p_lookback > interval.start;
        let before_upper = |sample: usize| match s {
            Some(s) => sample + self.s_guard < s.sample,
            None => sample < interval.end,
        };

        // A P must beat zero probability to be picked at all.
        let mut best: Option<Peak> = None;
        let mut floor = 0.0f32;
        for peak in p_peaks
            .iter()
            .filter(|peak| after_lower(peak.sample) && before_upper(peak.sample))
        {
            if peak.probability > floor {
                floor = peak.probability;
                best = Some(*peak);
            }
        }
        best
    }
}
