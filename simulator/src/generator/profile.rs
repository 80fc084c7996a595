use crate::generator::template::{add_gaussian, add_plateau};
use crate::workflow::input::{ChunkInput, StationInput};
use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use phasecore::interface::StationMeta;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for synthesising classifier output for one station.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub network: String,
    pub station: String,
    pub windows: usize,
    pub window_length: usize,
    pub start_time: DateTime<Utc>,
    /// Event onsets in samples from the chunk start.
    pub event_offsets: Vec<usize>,
    /// Extra events placed at seeded random onsets.
    pub random_events: usize,
    pub event_length: usize,
    pub s_lag: usize,
    pub noise: f32,
    pub probability_noise: f32,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            network: "XX".into(),
            station: "SYN".into(),
            windows: 10,
            window_length: 6000,
            start_time: Utc
                .with_ymd_and_hms(2019, 7, 4, 17, 0, 0)
                .single()
                .unwrap_or_default(),
            event_offsets: Vec::new(),
            random_events: 0,
            event_length: 500,
            s_lag: 200,
            noise: 0.05,
            probability_noise: 0.01,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    fn normalized_noise(&self) -> f32 {
        self.noise.abs().max(f32::EPSILON)
    }

    fn normalized_probability_noise(&self) -> f32 {
        self.probability_noise.abs().max(f32::EPSILON)
    }
}

fn event_onsets(config: &GeneratorConfig, total: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut onsets: Vec<usize> = config
        .event_offsets
        .iter()
        .copied()
        .filter(|&onset| onset < total)
        .collect();
    let span = total.saturating_sub(config.event_length);
    if span > 0 {
        onsets.extend((0..config.random_events).map(|_| rng.gen_range(0..span)));
    }
    onsets.sort_unstable();
    onsets
}

pub fn build_chunk(config: &GeneratorConfig) -> anyhow::Result<ChunkInput> {
    let total = config
        .windows
        .checked_mul(config.window_length)
        .context("overflow computing sample count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let onsets = event_onsets(config, total, &mut rng);

    let jitter = config.normalized_probability_noise();
    let mut detection: Vec<f32> = (0..total).map(|_| rng.gen_range(0.0..jitter)).collect();
    let mut p_probability: Vec<f32> = (0..total).map(|_| rng.gen_range(0.0..jitter)).collect();
    let mut s_probability: Vec<f32> = (0..total).map(|_| rng.gen_range(0.0..jitter)).collect();
    let mut envelope = vec![1.0f32; total];

    for &onset in &onsets {
        let end = onset + config.event_length;
        let s_arrival = onset + config.s_lag;
        add_plateau(&mut detection, onset, end, 0.9);
        add_gaussian(&mut p_probability, onset + 5, 8.0, 0.8);
        add_gaussian(&mut s_probability, s_arrival, 10.0, 0.9);
        add_plateau(&mut envelope, onset, end, 5.0);
        add_plateau(&mut envelope, s_arrival, end, 8.0);
    }

    let noise = config.normalized_noise();
    let waveform = envelope
        .iter()
        .map(|&gain| {
            [
                gain * rng.gen_range(-noise..noise),
                gain * rng.gen_range(-noise..noise),
                gain * rng.gen_range(-noise..noise),
            ]
        })
        .collect();

    Ok(ChunkInput {
        start_time: config.start_time,
        detection,
        p_probability,
        s_probability,
        waveform,
    })
}

pub fn build_station_input(config: &GeneratorConfig) -> anyhow::Result<StationInput> {
    let chunk = build_chunk(config)?;
    let meta = StationMeta {
        trace_name: Some(format!("{}.{}.synthetic", config.network, config.station)),
        ..StationMeta::new(&config.network, &config.station, "HH")
    };
    Ok(StationInput {
        meta,
        chunks: vec![chunk],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_expected_sample_count() {
        let config = GeneratorConfig {
            windows: 2,
            window_length: 1000,
            ..Default::default()
        };
        let chunk = build_chunk(&config).unwrap();
        assert_eq!(chunk.len(), 2000);
        assert_eq!(chunk.waveform.len(), 2000);
        assert!(chunk.check().is_ok());
    }

    #[test]
    fn generator_marks_events_in_every_trace() {
        let config = GeneratorConfig {
            windows: 1,
            window_length: 3000,
            event_offsets: vec![1000],
            ..Default::default()
        };
        let chunk = build_chunk(&config).unwrap();
        assert!(chunk.detection[1100] >= 0.9);
        assert!(chunk.detection[900] < 0.5);
        assert!(chunk.p_probability[1005] >= 0.8);
        assert!(chunk.s_probability[1200] >= 0.9);
    }

    #[test]
    fn generator_is_reproducible_for_a_seed() {
        let config = GeneratorConfig {
            windows: 1,
            window_length: 2000,
            random_events: 2,
            seed: 42,
            ..Default::default()
        };
        let a = build_chunk(&config).unwrap();
        let b = build_chunk(&config).unwrap();
        assert_eq!(a.detection, b.detection);
        assert_eq!(a.waveform, b.waveform);
    }

    #[test]
    fn station_input_carries_meta() {
        let config = GeneratorConfig {
            windows: 1,
            window_length: 100,
            station: "WBS".into(),
            ..Default::default()
        };
        let input = build_station_input(&config).unwrap();
        assert_eq!(input.meta.label(), "XX.WBS");
        assert_eq!(input.chunks.len(), 1);
    }
}
