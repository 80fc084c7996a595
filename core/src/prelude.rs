use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::interface::EventRecord;

/// Shared configuration for the picking pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub detection_threshold: f32,
    pub p_threshold: f32,
    pub s_threshold: f32,
    /// SNR half-window in samples.
    pub snr_window: usize,
    /// Fraction of a window re-analysed by the shifted pass; `None` disables it.
    pub overlap: Option<f32>,
    pub window_length: usize,
    pub sample_rate: f64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 0.5,
            p_threshold: 0.2,
            s_threshold: 0.2,
            snr_window: 100,
            overlap: Some(0.3),
            window_length: 6000,
            sample_rate: 100.0,
        }
    }
}

impl PickerConfig {
    pub fn validate(&self) -> PickResult<()> {
        for (name, value) in [
            ("detection_threshold", self.detection_threshold),
            ("p_threshold", self.p_threshold),
            ("s_threshold", self.s_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PickError::InvalidConfig(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.snr_window == 0 {
            return Err(PickError::InvalidConfig(
                "snr_window must be positive".into(),
            ));
        }
        if self.window_length == 0 {
            return Err(PickError::InvalidConfig(
                "window_length must be positive".into(),
            ));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(PickError::InvalidConfig(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if let Some(overlap) = self.overlap {
            if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
                return Err(PickError::InvalidConfig(format!(
                    "overlap must lie in [0, 1), got {}",
                    overlap
                )));
            }
        }

        Ok(())
    }

    /// Overlap fraction when the shifted pass is actually enabled.
    pub fn effective_overlap(&self) -> Option<f32> {
        self.overlap.filter(|&fraction| fraction > 0.0)
    }
}

/// One analysis window of classifier output plus the raw waveform it came from.
#[derive(Debug, Clone)]
pub struct WindowInput {
    pub detection: Vec<f32>,
    pub p_probability: Vec<f32>,
    pub s_probability: Vec<f32>,
    /// Raw waveform, shape `(samples, components)`.
    pub waveform: Array2<f32>,
    pub start_time: DateTime<Utc>,
}

/// Output produced by the picking stage for one window.
#[derive(Debug, Clone, Default)]
pub struct WindowOutput {
    pub records: Vec<EventRecord>,
    pub metadata: WindowMetadata,
}

/// Per-window counters used for chaining and telemetry.
#[derive(Debug, Clone, Default)]
pub struct WindowMetadata {
    pub detection_count: usize,
    pub match_count: usize,
    pub duplicate_count: usize,
    pub notes: Vec<String>,
}

/// Common error type for picking.
#[derive(thiserror::Error, Debug)]
pub enum PickError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type PickResult<T> = Result<T, PickError>;

/// Trait describing stateful per-station processing stages.
pub trait ProcessingStage {
    fn initialize(&mut self, config: &PickerConfig) -> PickResult<()>;
    fn execute(&mut self, input: WindowInput) -> PickResult<WindowOutput>;
    fn cleanup(&mut self);
}
