pub mod dedup;
pub mod matcher;
pub mod onset;
pub mod peaks;
pub mod picking;
pub mod snr;
pub mod windowing;

pub use dedup::EmittedLedger;
pub use matcher::PhaseMatcher;
pub use onset::OnsetDetector;
pub use peaks::{EdgeMode, PeakDetector};
pub use picking::{pick_window, PickingStage};
pub use snr::SnrEstimator;
pub use windowing::{plan_windows, Pass, WindowSpan};
