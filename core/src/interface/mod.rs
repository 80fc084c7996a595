pub mod event;
pub mod station;

pub use event::{offset_time, DetectionInterval, EventMatch, EventRecord, Peak};
pub use station::StationMeta;
