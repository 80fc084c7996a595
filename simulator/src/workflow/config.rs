use anyhow::Context;
use phasecore::prelude::PickerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub detection_threshold: f32,
    pub p_threshold: f32,
    pub s_threshold: f32,
    pub snr_window: usize,
    pub overlap: Option<f32>,
    pub window_length: usize,
    pub sample_rate: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let picker = PickerConfig::default();
        Self {
            detection_threshold: picker.detection_threshold,
            p_threshold: picker.p_threshold,
            s_threshold: picker.s_threshold,
            snr_window: picker.snr_window,
            overlap: picker.overlap,
            window_length: picker.window_length,
            sample_rate: picker.sample_rate,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .to_picker_config()
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        detection_threshold: f32,
        p_threshold: f32,
        s_threshold: f32,
        overlap: Option<f32>,
    ) -> Self {
        Self {
            detection_threshold,
            p_threshold,
            s_threshold,
            overlap,
            ..Default::default()
        }
    }

    pub fn to_picker_config(&self) -> PickerConfig {
        PickerConfig {
            detection_threshold: self.detection_threshold,
            p_threshold: self.p_threshold,
            s_threshold: self.s_threshold,
            snr_window: self.snr_window,
            overlap: self.overlap,
            window_length: self.window_length,
            sample_rate: self.sample_rate,
        }
    }
}
