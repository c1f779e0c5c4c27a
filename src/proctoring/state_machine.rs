//! One independent state machine per detection type, driven by the fixed
//! `{threshold, alert level, suppression window}` table in §4.5. All start
//! in "idle" (zero consecutive frames, no suppression in effect).

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use super::types::{AlertLevel, Detection, DetectionType};

struct DetectionConfig {
    alert_level: AlertLevel,
    consecutive_threshold: u32,
    suppression_window: ChronoDuration,
}

fn config_for(detection_type: DetectionType) -> DetectionConfig {
    match detection_type {
        DetectionType::GazeModerate => DetectionConfig {
            alert_level: AlertLevel::High,
            consecutive_threshold: 9,
            suppression_window: ChronoDuration::seconds(5),
        },
        DetectionType::GazeExtreme => DetectionConfig {
            alert_level: AlertLevel::Critical,
            consecutive_threshold: 3,
            suppression_window: ChronoDuration::seconds(3),
        },
        DetectionType::FaceAbsence => DetectionConfig {
            alert_level: AlertLevel::High,
            consecutive_threshold: 30,
            suppression_window: ChronoDuration::seconds(10),
        },
        DetectionType::MultipleFaces => DetectionConfig {
            alert_level: AlertLevel::Critical,
            consecutive_threshold: 10,
            suppression_window: ChronoDuration::seconds(10),
        },
        DetectionType::CellPhone => DetectionConfig {
            alert_level: AlertLevel::Critical,
            consecutive_threshold: 5,
            suppression_window: ChronoDuration::seconds(10),
        },
        DetectionType::LaptopOrBook => DetectionConfig {
            alert_level: AlertLevel::High,
            consecutive_threshold: 5,
            suppression_window: ChronoDuration::seconds(10),
        },
        DetectionType::AdditionalPerson => DetectionConfig {
            alert_level: AlertLevel::Critical,
            consecutive_threshold: 5,
            suppression_window: ChronoDuration::seconds(10),
        },
        DetectionType::ExcessiveMovement => DetectionConfig {
            alert_level: AlertLevel::Low,
            consecutive_threshold: 1,
            suppression_window: ChronoDuration::seconds(5),
        },
    }
}

/// Per-type bookkeeping: consecutive trigger count and the last time this
/// type fired (for suppression).
pub struct TypeStateMachine {
    detection_type: DetectionType,
    consecutive: u32,
    last_fired_at: Option<DateTime<Utc>>,
}

impl TypeStateMachine {
    pub fn new(detection_type: DetectionType) -> Self {
        Self {
            detection_type,
            consecutive: 0,
            last_fired_at: None,
        }
    }

    /// Feeds one frame's trigger predicate result. Returns `Some(Detection)`
    /// only when this frame causes a brand-new alert (threshold crossed,
    /// outside any active suppression window).
    pub fn observe(&mut self, triggered: bool, confidence: f32, frame_number: u64, now: DateTime<Utc>) -> Option<Detection> {
        if !triggered {
            self.consecutive = 0;
            return None;
        }

        self.consecutive += 1;
        let config = config_for(self.detection_type);

        if self.consecutive < config.consecutive_threshold {
            return None;
        }

        if let Some(last_fired_at) = self.last_fired_at {
            if now - last_fired_at < config.suppression_window {
                return None;
            }
        }

        self.last_fired_at = Some(now);
        Some(Detection {
            detection_type: self.detection_type,
            alert_level: config.alert_level,
            confidence,
            frame_number,
        })
    }
}
