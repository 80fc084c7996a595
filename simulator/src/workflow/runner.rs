use crate::workflow::config::WorkflowConfig;
use crate::workflow::input::StationInput;
use anyhow::Context;
use log::info;
use phasecore::interface::EventRecord;
use phasecore::prelude::ProcessingStage;
use phasecore::processing::{plan_windows, PickingStage};
use phasecore::telemetry::MetricsSnapshot;

pub struct StationResult {
    pub station: String,
    pub records: Vec<EventRecord>,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Runs every window of every chunk of one station against a single ledger.
    pub fn run_station(&self, input: &StationInput) -> anyhow::Result<StationResult> {
        let picker_config = self.config.to_picker_config();
        let label = input.meta.label();

        let mut stage = PickingStage::new(input.meta.clone());
        stage
            .initialize(&picker_config)
            .with_context(|| format!("initializing picking stage for {}", label))?;

        let mut records = Vec::new();
        for chunk in &input.chunks {
            chunk
                .check()
                .with_context(|| format!("checking chunk for {}", label))?;
            let spans = plan_windows(
                chunk.len(),
                picker_config.window_length,
                picker_config.effective_overlap(),
            );
            for span in &spans {
                let window = chunk.window(
                    span,
                    picker_config.window_length,
                    picker_config.sample_rate,
                )?;
                let output = stage.execute(window).with_context(|| {
                    format!("picking {} window at offset {}", label, span.offset)
                })?;
                records.extend(output.records);
            }
        }

        let metrics = stage.metrics();
        stage.cleanup();
        info!(
            "{}: {} windows, {} events, {} duplicates suppressed",
            label, metrics.windows, metrics.emitted, metrics.duplicates
        );

        Ok(StationResult {
            station: label,
            records,
            metrics,
        })
    }

    /// Stations one after another, in input order.
    pub fn run_all(&self, stations: &[StationInput]) -> anyhow::Result<Vec<StationResult>> {
        stations
            .iter()
            .map(|station| self.run_station(station))
            .collect()
    }

    /// One blocking task per station; results come back in input order.
    pub async fn run_parallel(
        &self,
        stations: Vec<StationInput>,
    ) -> anyhow::Result<Vec<StationResult>> {
        let handles: Vec<_> = stations
            .into_iter()
            .map(|station| {
                let runner = self.clone();
                tokio::task::spawn_blocking(move || runner.run_station(&station))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.context("joining station task")??);
        }
        Ok(results)
    }
}
