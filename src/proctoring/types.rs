//! Shared types for the proctoring pipeline (§4.5)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionType {
    GazeModerate,
    GazeExtreme,
    FaceAbsence,
    MultipleFaces,
    CellPhone,
    LaptopOrBook,
    AdditionalPerson,
    ExcessiveMovement,
}

impl DetectionType {
    pub const ALL: [DetectionType; 8] = [
        DetectionType::GazeModerate,
        DetectionType::GazeExtreme,
        DetectionType::FaceAbsence,
        DetectionType::MultipleFaces,
        DetectionType::CellPhone,
        DetectionType::LaptopOrBook,
        DetectionType::AdditionalPerson,
        DetectionType::ExcessiveMovement,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub detection_type: DetectionType,
    pub alert_level: AlertLevel,
    pub confidence: f32,
    pub frame_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub frame_number: u64,
    pub detections: Vec<Detection>,
    pub risk_score: f32,
    pub risk_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringStatus {
    pub frame_count: u64,
    pub risk_score: f32,
    pub risk_level: String,
    pub recent_warnings: Vec<Detection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionTypeCount {
    pub detection_type: DetectionType,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub total_frames: u64,
    pub duration_seconds: f32,
    pub counts_by_type: Vec<DetectionTypeCount>,
    pub alert_timeline: Vec<Detection>,
    pub final_risk_score: f32,
    pub final_risk_level: String,
}

/// The general-purpose object detector's watch-list (§4.5 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchListObject {
    CellPhone,
    Laptop,
    Book,
    AdditionalPerson,
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectObservation {
    pub object: WatchListObject,
    pub confidence: f32,
}

/// Everything the per-frame pipeline (face, gaze, objects, movement)
/// produces for one frame, independent of state-machine bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct FrameObservations {
    pub face_count: usize,
    /// Total gaze deviation (`sqrt(horizontal^2 + vertical^2)`), only
    /// meaningful when exactly one face is present.
    pub gaze_deviation: Option<f32>,
    pub objects: Vec<ObjectObservation>,
    pub movement_score: f32,
}
