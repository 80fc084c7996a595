use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use phasecore::interface::{offset_time, StationMeta};
use phasecore::processing::WindowSpan;
use phasecore::WindowInput;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Continuous classifier output for one stretch of a station's data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkInput {
    pub start_time: DateTime<Utc>,
    pub detection: Vec<f32>,
    pub p_probability: Vec<f32>,
    pub s_probability: Vec<f32>,
    /// Rows of `[E, N, Z]` samples.
    pub waveform: Vec<[f32; 3]>,
}

impl ChunkInput {
    pub fn len(&self) -> usize {
        self.detection.len()
    }

    pub fn check(&self) -> anyhow::Result<()> {
        let len = self.len();
        if self.p_probability.len() != len
            || self.s_probability.len() != len
            || self.waveform.len() != len
        {
            bail!(
                "chunk at {} has mismatched lengths: detection {}, p {}, s {}, waveform {}",
                self.start_time,
                len,
                self.p_probability.len(),
                self.s_probability.len(),
                self.waveform.len()
            );
        }
        Ok(())
    }

    /// Copies out the window described by `span`.
    pub fn window(
        &self,
        span: &WindowSpan,
        window_length: usize,
        sample_rate: f64,
    ) -> anyhow::Result<WindowInput> {
        let range = span.offset..span.offset + window_length;
        if range.end > self.len() {
            bail!(
                "window at offset {} runs past chunk end {}",
                span.offset,
                self.len()
            );
        }
        let start_time = offset_time(self.start_time, span.offset, sample_rate)
            .with_context(|| format!("timing window at offset {}", span.offset))?;
        let waveform = Array2::from_shape_fn((window_length, 3), |(row, col)| {
            self.waveform[span.offset + row][col]
        });

        Ok(WindowInput {
            detection: self.detection[range.clone()].to_vec(),
            p_probability: self.p_probability[range.clone()].to_vec(),
            s_probability: self.s_probability[range].to_vec(),
            waveform,
            start_time,
        })
    }
}

/// All chunks recorded by one station, in time order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInput {
    pub meta: StationMeta,
    pub chunks: Vec<ChunkInput>,
}

pub fn load_stations<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StationInput>> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading station input {}", path_ref.display()))?;
    let mut stations: Vec<StationInput> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing station input {}", path_ref.display()))?;
    for station in &mut stations {
        station.chunks.sort_by_key(|chunk| chunk.start_time);
    }
    stations.sort_by(|a, b| a.meta.label().cmp(&b.meta.label()));
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use phasecore::processing::Pass;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn chunk(len: usize) -> ChunkInput {
        ChunkInput {
            start_time: Utc.with_ymd_and_hms(2019, 7, 4, 0, 0, 0).unwrap(),
            detection: (0..len).map(|i| i as f32).collect(),
            p_probability: vec![0.0; len],
            s_probability: vec![0.0; len],
            waveform: (0..len).map(|i| [i as f32, 0.0, 0.0]).collect(),
        }
    }

    #[test]
    fn window_slices_traces_and_shifts_start_time() {
        let chunk = chunk(300);
        let span = WindowSpan {
            offset: 70,
            pass: Pass::Overlap,
        };
        let window = chunk.window(&span, 100, 100.0).unwrap();
        assert_eq!(window.detection[0], 70.0);
        assert_eq!(window.waveform[[99, 0]], 169.0);
        assert_eq!(window.start_time, chunk.start_time + Duration::milliseconds(700));
    }

    #[test]
    fn window_past_chunk_end_is_rejected() {
        let span = WindowSpan {
            offset: 250,
            pass: Pass::Primary,
        };
        assert!(chunk(300).window(&span, 100, 100.0).is_err());
    }

    #[test]
    fn window_with_zero_sample_rate_is_rejected() {
        let span = WindowSpan {
            offset: 100,
            pass: Pass::Primary,
        };
        assert!(chunk(300).window(&span, 100, 0.0).is_err());
    }

    #[test]
    fn mismatched_chunk_fails_check() {
        let mut bad = chunk(10);
        bad.waveform.pop();
        assert!(bad.check().is_err());
        assert!(chunk(10).check().is_ok());
    }

    #[test]
    fn load_stations_sorts_by_label() {
        let stations = vec![
            StationInput {
                meta: StationMeta::new("CI", "WBS", "HH"),
                chunks: vec![chunk(5)],
            },
            StationInput {
                meta: StationMeta::new("CI", "CCC", "HH"),
                chunks: vec![],
            },
        ];
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(serde_json::to_string(&stations).unwrap().as_bytes())
            .unwrap();
        let path = temp.into_temp_path();

        let loaded = load_stations(&path).unwrap();
        assert_eq!(loaded[0].meta.station, "CCC");
        assert_eq!(loaded[1].chunks[0].len(), 5);
    }
}
