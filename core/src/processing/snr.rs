use std::ops::Range;

use ndarray::{s, ArrayView2};

use crate::math::stats::StatsHelper;

/// Percentile-ratio SNR around an arrival pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnrEstimator {
    /// Noise and signal segment length in samples before boundary shrinking.
    pub window: usize,
}

impl Default for SnrEstimator {
    fn default() -> Self {
        Self { window: 100 }
    }
}

impl SnrEstimator {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Noise and signal row ranges for an arrival at `arrival` in a trace of `len` samples.
    ///
    /// Near the start the window shrinks to the arrival index so the noise
    /// segment stays in bounds; near the end it shrinks to the remaining
    /// samples. The signal range is clipped to the trace length.
    pub fn segments(&self, len: usize, arrival: usize) -> Option<(Range<usize>, Range<usize>)> {
        if arrival >= len {
            return None;
        }
        let width = if arrival < self.window {
            arrival
        } else if arrival + self.window > len {
            len - arrival
        } else {
            self.window
        };
        if width == 0 {
            return None;
        }
        let signal_end = (arrival + width).min(len);
        Some((arrival - width..arrival, arrival..signal_end))
    }

    /// SNR in dB, rounded to one decimal, over all components of `waveform`
    /// (shape `(samples, components)`).
    ///
    /// `None` when there is no arrival, the segments are empty, either 95th
    /// percentile is not strictly positive, or the result is not finite.
    pub fn snr_db(&self, waveform: ArrayView2<f32>, arrival: Option<usize>) -> Option<f32> {
        let arrival = arrival?;
        let (noise, signal) = self.segments(waveform.nrows(), arrival)?;

        let noise_level =
            StatsHelper::percentile(waveform.slice(s![noise, ..]).iter().copied(), 95.0)?;
        let signal_level =
            StatsHelper::percentile(waveform.slice(s![signal, ..]).iter().copied(), 95.0)?;
        if noise_level <= 0.0 || signal_level <= 0.0 {
            return None;
        }

        let snr = 10.0 * (signal_level / noise_level).powi(2).log10();
        snr.is_finite().then(|| StatsHelper::round_to(snr, 1) as f32)
    }

    /// Convenience wrapper for a single-component trace.
    pub fn snr_db_single(&self, trace: &[f32], arrival: Option<usize>) -> Option<f32> {
        let view = ArrayView2::from_shape((trace.len(), 1), trace).ok()?;
        self.snr_db(view, arrival)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn step_waveform(len: usize, step_at: usize, low: f32, high: f32) -> Array2<f32> {
        Array2::from_shape_fn((len, 3), |(row, _)| if row < step_at { low } else { high })
    }

    #[test]
    fn missing_arrival_yields_none() {
        let waveform = step_waveform(1000, 500, 1.0, 10.0);
        assert_eq!(SnrEstimator::new(100).snr_db(waveform.view(), None), None);
    }

    #[test]
    fn tenfold_amplitude_step_is_twenty_db() {
        let waveform = step_waveform(1000, 500, 1.0, 10.0);
        let snr = SnrEstimator::new(100).snr_db(waveform.view(), Some(500));
        assert_eq!(snr, Some(20.0));
    }

    #[test]
    fn early_arrival_shrinks_noise_window() {
        let estimator = SnrEstimator::new(100);
        let (noise, signal) = estimator.segments(1000, 5).unwrap();
        assert_eq!(noise, 0..5);
        assert_eq!(signal, 5..10);

        let waveform = step_waveform(1000, 5, 2.0, 4.0);
        let snr = estimator.snr_db(waveform.view(), Some(5));
        assert!(snr.map_or(true, f32::is_finite));
        assert_eq!(snr, Some(6.0));
    }

    #[test]
    fn late_arrival_shrinks_to_remaining_samples() {
        let estimator = SnrEstimator::new(100);
        let (noise, signal) = estimator.segments(1000, 950).unwrap();
        assert_eq!(noise, 900..950);
        assert_eq!(signal, 950..1000);
    }

    #[test]
    fn exact_fit_keeps_full_window() {
        let (noise, signal) = SnrEstimator::new(100).segments(1000, 900).unwrap();
        assert_eq!(noise, 800..900);
        assert_eq!(signal, 900..1000);
    }

    #[test]
    fn degenerate_noise_is_suppressed() {
        let waveform = step_waveform(1000, 500, 0.0, 5.0);
        assert_eq!(SnrEstimator::new(100).snr_db(waveform.view(), Some(500)), None);
        assert_eq!(SnrEstimator::new(100).snr_db(waveform.view(), Some(0)), None);
        assert_eq!(SnrEstimator::new(100).snr_db(waveform.view(), Some(5000)), None);
    }

    #[test]
    fn single_component_matches_column_view() {
        let trace: Vec<f32> = (0..400).map(|i| if i < 200 { 1.0 } else { 3.0 }).collect();
        let snr = SnrEstimator::new(50).snr_db_single(&trace, Some(200));
        assert_eq!(snr, Some(9.5));
    }
}
