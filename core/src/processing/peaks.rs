use serde::{Deserialize, Serialize};

use crate::interface::Peak;
use crate::math::stats::StatsHelper;

/// Which side of a flat-topped peak is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Only strict local maxima; plateaus are never reported.
    Strict,
    /// First sample of a plateau (strict rise before, non-strict fall after).
    Rising,
    /// Last sample of a plateau (non-strict rise before, strict fall after).
    Falling,
    Both,
}

/// Local-maximum finder shared by the P and S traces.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakDetector {
    pub min_height: Option<f32>,
    pub min_distance: usize,
    pub edge: EdgeMode,
    pub relative_threshold: f32,
    pub keep_equal_heights: bool,
    pub find_valleys: bool,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            min_height: None,
            min_distance: 1,
            edge: EdgeMode::Rising,
            relative_threshold: 0.0,
            keep_equal_heights: false,
            find_valleys: false,
        }
    }
}

impl PeakDetector {
    /// Detector used for arrival traces: rising edge, unit distance, `min_height` floor.
    pub fn with_min_height(min_height: f32) -> Self {
        Self {
            min_height: Some(min_height),
            ..Default::default()
        }
    }

    /// Indices of the detected peaks in ascending order.
    pub fn find(&self, trace: &[f32]) -> Vec<usize> {
        let n = trace.len();
        if n < 3 {
            return Vec::new();
        }

        let x: Vec<f64> = trace
            .iter()
            .map(|&v| {
                let v = f64::from(v);
                if self.find_valleys {
                    -v
                } else {
                    v
                }
            })
            .collect();

        let mut candidates: Vec<usize> = (1..n - 1)
            .filter(|&i| !(x[i - 1].is_nan() || x[i].is_nan() || x[i + 1].is_nan()))
            .filter(|&i| self.is_candidate(x[i] - x[i - 1], x[i + 1] - x[i]))
            .collect();

        if let Some(min_height) = self.min_height {
            let min_height = f64::from(min_height);
            candidates.retain(|&i| x[i] >= min_height);
        }

        if self.relative_threshold > 0.0 {
            let threshold = f64::from(self.relative_threshold);
            candidates.retain(|&i| (x[i] - x[i - 1]).min(x[i] - x[i + 1]) >= threshold);
        }

        if self.min_distance > 1 && !candidates.is_empty() {
            candidates = self.enforce_distance(&x, candidates);
        }

        candidates
    }

    /// Peaks of `trace` with their probability rounded to three decimals.
    pub fn picks(&self, trace: &[f32]) -> Vec<Peak> {
        self.find(trace)
            .into_iter()
            .map(|i| Peak::new(i, StatsHelper::round_to(f64::from(trace[i]), 3) as f32))
            .collect()
    }

    fn is_candidate(&self, rise: f64, next: f64) -> bool {
        match self.edge {
            EdgeMode::Strict => rise > 0.0 && next < 0.0,
            EdgeMode::Rising => rise > 0.0 && next <= 0.0,
            EdgeMode::Falling => rise >= 0.0 && next < 0.0,
            EdgeMode::Both => (rise > 0.0 && next <= 0.0) || (rise >= 0.0 && next < 0.0),
        }
    }

    fn enforce_distance(&self, x: &[f64], candidates: Vec<usize>) -> Vec<usize> {
        let mut by_height = candidates;
        by_height.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
        by_height.reverse();

        let distance = self.min_distance;
        let mut removed = vec![false; by_height.len()];
        for i in 0..by_height.len() {
            if removed[i] {
                continue;
            }
            let center = by_height[i];
            let low = center.saturating_sub(distance);
            let high = center.saturating_add(distance);
            for j in 0..by_height.len() {
                if j == i {
                    continue;
                }
                let other = by_height[j];
                let in_range = other >= low && other <= high;
                let lower = !self.keep_equal_heights || x[center] > x[other];
                if in_range && lower {
                    removed[j] = true;
                }
            }
        }

        let mut kept: Vec<usize> = by_height
            .into_iter()
            .zip(removed)
            .filter_map(|(idx, gone)| (!gone).then_some(idx))
            .collect();
        kept.sort_unstable();
        kept
    }
}
