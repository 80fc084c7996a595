use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::interface::station::StationMeta;
use crate::prelude::{PickError, PickResult};

/// Local maximum of a P or S probability trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub sample: usize,
    pub probability: f32,
    /// Always `None`; the engine does not estimate pick uncertainty.
    pub uncertainty: Option<f32>,
}

impl Peak {
    pub fn new(sample: usize, probability: f32) -> Self {
        Self {
            sample,
            probability,
            uncertainty: None,
        }
    }
}

/// Half-open `[start, end)` span where the detection trace stayed above threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionInterval {
    pub start: usize,
    pub end: usize,
    pub mean_probability: f32,
}

impl DetectionInterval {
    pub fn duration(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// A detection interval paired with at most one P and one S pick.
///
/// At least one of `p` and `s` is always present; [`EventMatch::new`] refuses
/// to build a match without a pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventMatch {
    pub detection_start: usize,
    pub detection_end: usize,
    pub detection_probability: f32,
    pub detection_uncertainty: Option<f32>,
    pub p: Option<Peak>,
    pub s: Option<Peak>,
}

impl EventMatch {
    pub fn new(interval: &DetectionInterval, p: Option<Peak>, s: Option<Peak>) -> Option<Self> {
        if p.is_none() && s.is_none() {
            return None;
        }
        Some(Self {
            detection_start: interval.start,
            detection_end: interval.end,
            detection_probability: interval.mean_probability,
            detection_uncertainty: None,
            p,
            s,
        })
    }

    pub fn p_sample(&self) -> Option<usize> {
        self.p.map(|peak| peak.sample)
    }

    pub fn s_sample(&self) -> Option<usize> {
        self.s.map(|peak| peak.sample)
    }
}

/// Absolute time of `samples` past `start` at `sample_rate` Hz.
pub fn offset_time(
    start: DateTime<Utc>,
    samples: usize,
    sample_rate: f64,
) -> PickResult<DateTime<Utc>> {
    let micros = (samples as f64 / sample_rate * 1_000_000.0).round();
    if !micros.is_finite() || micros < 0.0 || micros >= i64::MAX as f64 {
        return Err(PickError::InvalidInput(format!(
            "{} samples at {} Hz is not a representable offset",
            samples, sample_rate
        )));
    }
    start
        .checked_add_signed(Duration::microseconds(micros as i64))
        .ok_or_else(|| {
            PickError::InvalidInput(format!(
                "{} plus {} samples is out of range",
                start, samples
            ))
        })
}

/// Event emitted to the writer: an [`EventMatch`] in absolute time with SNR estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(flatten)]
    pub station: StationMeta,
    pub event_start_time: DateTime<Utc>,
    pub event_end_time: DateTime<Utc>,
    pub detection_probability: f32,
    pub detection_uncertainty: Option<f32>,
    pub p_arrival_time: Option<DateTime<Utc>>,
    pub p_probability: Option<f32>,
    pub p_uncertainty: Option<f32>,
    pub p_snr: Option<f32>,
    pub s_arrival_time: Option<DateTime<Utc>>,
    pub s_probability: Option<f32>,
    pub s_uncertainty: Option<f32>,
    pub s_snr: Option<f32>,
}

impl EventRecord {
    pub fn from_match(
        station: &StationMeta,
        window_start: DateTime<Utc>,
        sample_rate: f64,
        event: &EventMatch,
        p_snr: Option<f32>,
        s_snr: Option<f32>,
    ) -> PickResult<Self> {
        let at = |sample: usize| offset_time(window_start, sample, sample_rate);
        Ok(Self {
            station: station.clone(),
            event_start_time: at(event.detection_start)?,
            event_end_time: at(event.detection_end)?,
            detection_probability: event.detection_probability,
            detection_uncertainty: event.detection_uncertainty,
            p_arrival_time: event.p.map(|peak| at(peak.sample)).transpose()?,
            p_probability: event.p.map(|peak| peak.probability),
            p_uncertainty: event.p.and_then(|peak| peak.uncertainty),
            p_snr,
            s_arrival_time: event.s.map(|peak| at(peak.sample)).transpose()?,
            s_probability: event.s.map(|peak| peak.probability),
            s_uncertainty: event.s.and_then(|peak| peak.uncertainty),
            s_snr,
        })
    }
}
