use serde::{Deserialize, Serialize};

/// Station metadata carried through to every emitted record untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationMeta {
    pub network: String,
    pub station: String,
    pub instrument_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_name: Option<String>,
}

impl StationMeta {
    pub fn new(network: &str, station: &str, instrument_type: &str) -> Self {
        Self {
            network: network.to_string(),
            station: station.to_string(),
            instrument_type: instrument_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64, elevation_m: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self.elevation_m = elevation_m;
        self
    }

    /// `NET.STA` label used in log lines.
    pub fn label(&self) -> String {
        format!("{}.{}", self.network, self.station)
    }
}
