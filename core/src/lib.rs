//! Detection and phase-picking core for single-station seismic probability traces.
//!
//! The modules turn the detection, P and S probability curves produced by an
//! external classifier into deduplicated event records with optional arrival
//! picks and SNR estimates.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{PickError, PickResult, PickerConfig, ProcessingStage, WindowInput};
