//! Frame-by-frame proctoring pipeline: face/gaze/object/movement detection,
//! per-type alert state machines, rolling risk score (§4.5)

pub mod clock;
pub mod engine;
pub mod risk;
pub mod state_machine;
pub mod types;
pub mod vision;

pub use clock::{Clock, SystemClock};
pub use engine::{ProctoringEngine, ProctoringError};
pub use types::{
    AlertLevel, Detection, DetectionType, DetectionTypeCount, FinalReport, FrameAnalysis, MonitoringStatus,
};
