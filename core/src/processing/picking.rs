use crate::interface::{EventRecord, StationMeta};
use crate::prelude::{
    PickError, PickResult, PickerConfig, ProcessingStage, WindowInput, WindowMetadata,
    WindowOutput,
};
use crate::processing::dedup::EmittedLedger;
use crate::processing::matcher::PhaseMatcher;
use crate::processing::onset::OnsetDetector;
use crate::processing::peaks::PeakDetector;
use crate::processing::snr::SnrEstimator;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};

fn check_lengths(config: &PickerConfig, input: &WindowInput) -> PickResult<()> {
    let expected = config.window_length;
    for (name, len) in [
        ("detection", input.detection.len()),
        ("p_probability", input.p_probability.len()),
        ("s_probability", input.s_probability.len()),
        ("waveform", input.waveform.nrows()),
    ] {
        if len != expected {
            return Err(PickError::InvalidInput(format!(
                "{} has {} samples, expected {}",
                name, len, expected
            )));
        }
    }
    Ok(())
}

/// Runs detection, picking, SNR and deduplication over one window.
///
/// `config` is validated first, so an unchecked config fails with
/// `InvalidConfig` before any trace is read. Records are returned in
/// detection order; those already present in `ledger` are dropped and
/// counted in the metadata.
pub fn pick_window(
    config: &PickerConfig,
    station: &StationMeta,
    input: &WindowInput,
    ledger: &mut EmittedLedger,
) -> PickResult<WindowOutput> {
    config.validate()?;
    check_lengths(config, input)?;

    let detections = OnsetDetector::level(config.detection_threshold).detect(&input.detection);
    let p_peaks = PeakDetector::with_min_height(config.p_threshold).picks(&input.p_probability);
    let s_peaks = PeakDetector::with_min_height(config.s_threshold).picks(&input.s_probability);
    let matches = PhaseMatcher::default().match_events(&detections, &p_peaks, &s_peaks);

    let snr = SnrEstimator::new(config.snr_window);
    let waveform = input.waveform.view();
    let mut records = Vec::with_capacity(matches.len());
    let mut duplicate_count = 0;

    for event in &matches {
        let record = EventRecord::from_match(
            station,
            input.start_time,
            config.sample_rate,
            event,
            snr.snr_db(waveform, event.p_sample()),
            snr.snr_db(waveform, event.s_sample()),
        )?;
        if ledger.admit(record.event_start_time) {
            records.push(record);
        } else {
            duplicate_count += 1;
        }
    }

    let metadata = WindowMetadata {
        detection_count: detections.len(),
        match_count: matches.len(),
        duplicate_count,
        notes: vec![format!("p_peaks {} s_peaks {}", p_peaks.len(), s_peaks.len())],
    };

    Ok(WindowOutput { records, metadata })
}

/// Per-station picking stage owning the emitted-event ledger.
///
/// `cleanup` forgets the ledger, so a stage must be cleaned up (or rebuilt)
/// before it is reused for another station.
pub struct PickingStage {
    station: StationMeta,
    config: Option<PickerConfig>,
    ledger: EmittedLedger,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl PickingStage {
    pub fn new(station: StationMeta) -> Self {
        Self {
            station,
            config: None,
            ledger: EmittedLedger::new(),
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn station(&self) -> &StationMeta {
        &self.station
    }

    pub fn ledger(&self) -> &EmittedLedger {
        &self.ledger
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Switches to another station, discarding the previous station's ledger.
    pub fn begin_station(&mut self, station: StationMeta) {
        self.ledger.reset();
        self.station = station;
    }
}

impl ProcessingStage for PickingStage {
    fn initialize(&mut self, config: &PickerConfig) -> PickResult<()> {
        config.validate()?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: WindowInput) -> PickResult<WindowOutput> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| PickError::Internal("stage not initialized".into()))?;

        let output = match pick_window(config, &self.station, &input, &mut self.ledger) {
            Ok(output) => output,
            Err(err) => {
                self.metrics.record_error();
                return Err(err);
            }
        };

        let meta = &output.metadata;
        self.metrics.record_window(output.records.len(), meta.duplicate_count);
        self.logger.record(&format!(
            "{} window {} detections {} matches {} emitted {}",
            self.station.label(),
            input.start_time.format("%Y-%m-%dT%H:%M:%S%.3f"),
            meta.detection_count,
            meta.match_count,
            output.records.len()
        ));
        for note in &meta.notes {
            self.logger.detail(note);
        }
        if meta.duplicate_count > 0 {
            self.logger.warn(&format!(
                "{} suppressed {} duplicate event(s)",
                self.station.label(),
                meta.duplicate_count
            ));
        }

        Ok(output)
    }

    fn cleanup(&mut self) {
        self.ledger.reset();
        self.config = None;
    }
}
