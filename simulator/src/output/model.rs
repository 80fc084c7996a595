use crate::workflow::runner::StationResult;
use phasecore::telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Totals across a whole run, appended to the report log.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunSummary {
    pub stations: usize,
    pub windows: usize,
    pub events: usize,
    pub duplicates: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn from_results(results: &[StationResult]) -> Self {
        let mut totals = MetricsSnapshot::default();
        for result in results {
            totals.merge(&result.metrics);
        }
        Self {
            stations: results.len(),
            windows: totals.windows,
            events: results.iter().map(|r| r.records.len()).sum(),
            duplicates: totals.duplicates,
            errors: totals.errors,
        }
    }

    pub fn report_line(&self) -> String {
        format!(
            "stations={} windows={} events={} duplicates={} errors={}\n",
            self.stations, self.windows, self.events, self.duplicates, self.errors
        )
    }
}
