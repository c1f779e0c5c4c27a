//! Proctoring Engine (§4.5): owns per-interview monitoring state, runs the
//! per-frame pipeline, and maintains the rolling risk score.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::config::{Config, RiskWeights};

use super::clock::{Clock, SystemClock};
use super::risk::RiskAccumulator;
use super::state_machine::TypeStateMachine;
use super::types::{
    Detection, DetectionType, DetectionTypeCount, FinalReport, FrameAnalysis, MonitoringStatus, WatchListObject,
};
use super::vision::{FrameAnalyzer, OnnxFrameAnalyzer};

const RECENT_WARNINGS_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum ProctoringError {
    #[error("no monitoring session for interview {0}")]
    UnknownSession(String),
    #[error("malformed frame: {0}")]
    BadFrame(String),
}

struct SessionState {
    frame_count: u64,
    started_at: DateTime<Utc>,
    machines: HashMap<DetectionType, TypeStateMachine>,
    risk: RiskAccumulator,
    alert_timeline: Vec<Detection>,
    previous_frame: Option<image::DynamicImage>,
}

impl SessionState {
    fn new(weights: RiskWeights, normaliser: f32, started_at: DateTime<Utc>) -> Self {
        let machines = DetectionType::ALL
            .into_iter()
            .map(|t| (t, TypeStateMachine::new(t)))
            .collect();
        Self {
            frame_count: 0,
            started_at,
            machines,
            risk: RiskAccumulator::new(weights, normaliser),
            alert_timeline: Vec::new(),
            previous_frame: None,
        }
    }
}

/// Coordinates the per-frame pipeline across every interview currently
/// being monitored. Disabled entirely (degraded mode) if the vision models
/// failed to load at startup; `analyze_frame` then always reports an
/// `"unavailable"` risk level instead of failing the request.
pub struct ProctoringEngine {
    analyzer: Option<Arc<dyn FrameAnalyzer>>,
    clock: Arc<dyn Clock>,
    weights: RiskWeights,
    normaliser: f32,
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl ProctoringEngine {
    /// Attempts to load both vision models. Missing paths or a load failure
    /// put the engine in degraded mode rather than propagating an error,
    /// per §4.5's "model initialisation failure disables the whole engine"
    /// rule; the caller decides whether that's fatal via `allow_degraded_startup`.
    pub fn from_config(config: &Config) -> Self {
        let analyzer = match (&config.face_mesh_model_path, &config.object_detection_model_path) {
            (Some(face_path), Some(object_path)) => match OnnxFrameAnalyzer::load(face_path, object_path) {
                Ok(analyzer) => Some(Arc::new(analyzer) as Arc<dyn FrameAnalyzer>),
                Err(err) => {
                    tracing::error!("proctoring engine disabled: failed to load vision models: {:#}", err);
                    None
                }
            },
            _ => {
                tracing::warn!("proctoring engine disabled: no vision model paths configured");
                None
            }
        };

        Self::new(analyzer, Arc::new(SystemClock), config.risk_weights, config.risk_normaliser)
    }

    pub fn new(
        analyzer: Option<Arc<dyn FrameAnalyzer>>,
        clock: Arc<dyn Clock>,
        weights: RiskWeights,
        normaliser: f32,
    ) -> Self {
        Self {
            analyzer,
            clock,
            weights,
            normaliser,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Idempotent: calling this for an interview already being monitored
    /// leaves its accumulated state untouched.
    pub fn start_monitoring(&self, interview_id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(interview_id.to_string())
            .or_insert_with(|| SessionState::new(self.weights, self.normaliser, self.clock.now()));
    }

    pub fn analyze_frame(&self, interview_id: &str, frame_bytes: &[u8]) -> Result<FrameAnalysis, ProctoringError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(interview_id)
            .ok_or_else(|| ProctoringError::UnknownSession(interview_id.to_string()))?;

        let Some(analyzer) = &self.analyzer else {
            return Ok(FrameAnalysis {
                frame_number: session.frame_count,
                detections: Vec::new(),
                risk_score: 0.0,
                risk_level: "unavailable".to_string(),
            });
        };

        let image = image::load_from_memory(frame_bytes).map_err(|err| ProctoringError::BadFrame(err.to_string()))?;

        session.frame_count += 1;
        let frame_number = session.frame_count;
        let now = self.clock.now();

        let observations = analyzer.analyze(&image, session.previous_frame.as_ref());
        session.previous_frame = Some(image);

        let mut fired = Vec::new();
        let mut fire = |detection_type: DetectionType, triggered: bool, confidence: f32| {
            if let Some(detection) = session
                .machines
                .get_mut(&detection_type)
                .expect("all detection types are pre-populated")
                .observe(triggered, confidence, frame_number, now)
            {
                fired.push(detection);
            }
        };

        let gaze = observations.gaze_deviation.filter(|_| observations.face_count == 1);
        fire(
            DetectionType::GazeModerate,
            matches!(gaze, Some(d) if (0.25..0.40).contains(&d)),
            1.0,
        );
        fire(DetectionType::GazeExtreme, matches!(gaze, Some(d) if d >= 0.40), 1.0);
        fire(DetectionType::FaceAbsence, observations.face_count == 0, 1.0);
        fire(DetectionType::MultipleFaces, observations.face_count > 1, 1.0);

        let cell_phone_confidence = observations
            .objects
            .iter()
            .filter(|o| o.object == WatchListObject::CellPhone)
            .map(|o| o.confidence)
            .fold(0.0_f32, f32::max);
        fire(DetectionType::CellPhone, cell_phone_confidence > 0.0, cell_phone_confidence);

        let laptop_book_confidence = observations
            .objects
            .iter()
            .filter(|o| matches!(o.object, WatchListObject::Laptop | WatchListObject::Book))
            .map(|o| o.confidence)
            .fold(0.0_f32, f32::max);
        fire(DetectionType::LaptopOrBook, laptop_book_confidence > 0.0, laptop_book_confidence);

        let additional_person_confidence = observations
            .objects
            .iter()
            .filter(|o| o.object == WatchListObject::AdditionalPerson)
            .map(|o| o.confidence)
            .fold(0.0_f32, f32::max);
        fire(
            DetectionType::AdditionalPerson,
            additional_person_confidence > 0.0,
            additional_person_confidence,
        );

        const MOVEMENT_THRESHOLD: f32 = 0.3;
        fire(
            DetectionType::ExcessiveMovement,
            observations.movement_score > MOVEMENT_THRESHOLD,
            1.0,
        );

        for detection in &fired {
            session.risk.record(detection.alert_level, detection.confidence);
        }
        session.alert_timeline.extend(fired.clone());

        Ok(FrameAnalysis {
            frame_number,
            detections: fired,
            risk_score: session.risk.score(),
            risk_level: session.risk.level().to_string(),
        })
    }

    pub fn get_status(&self, interview_id: &str) -> Result<MonitoringStatus, ProctoringError> {
        let sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get(interview_id)
            .ok_or_else(|| ProctoringError::UnknownSession(interview_id.to_string()))?;

        let recent_warnings = session
            .alert_timeline
            .iter()
            .rev()
            .take(RECENT_WARNINGS_LIMIT)
            .rev()
            .cloned()
            .collect();

        Ok(MonitoringStatus {
            frame_count: session.frame_count,
            risk_score: session.risk.score(),
            risk_level: session.risk.level().to_string(),
            recent_warnings,
        })
    }

    /// Emits the final aggregate report and discards the in-memory session.
    pub fn stop_monitoring(&self, interview_id: &str) -> Result<FinalReport, ProctoringError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .remove(interview_id)
            .ok_or_else(|| ProctoringError::UnknownSession(interview_id.to_string()))?;

        let mut counts_by_type: HashMap<DetectionType, u64> = HashMap::new();
        for detection in &session.alert_timeline {
            *counts_by_type.entry(detection.detection_type).or_insert(0) += 1;
        }
        let counts_by_type = counts_by_type
            .into_iter()
            .map(|(detection_type, count)| DetectionTypeCount { detection_type, count })
            .collect();

        let duration_seconds = (self.clock.now() - session.started_at).num_milliseconds() as f32 / 1000.0;

        Ok(FinalReport {
            total_frames: session.frame_count,
            duration_seconds,
            counts_by_type,
            alert_timeline: session.alert_timeline,
            final_risk_score: session.risk.score(),
            final_risk_level: session.risk.level().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proctoring::clock::FixedClock;
    use crate::proctoring::types::{FrameObservations, ObjectObservation};
    use chrono::TimeZone;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedAnalyzer {
        frames: Vec<FrameObservations>,
        cursor: AtomicUsize,
    }

    impl FrameAnalyzer for ScriptedAnalyzer {
        fn analyze(&self, _frame: &image::DynamicImage, _previous: Option<&image::DynamicImage>) -> FrameObservations {
            let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
            self.frames.get(idx).cloned().unwrap_or_default()
        }
    }

    fn jpeg_bytes() -> Vec<u8> {
        let image = RgbImage::from_pixel(16, 16, Rgb([12, 34, 56]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn engine_with(frames: Vec<FrameObservations>, normaliser: f32) -> ProctoringEngine {
        let analyzer = Arc::new(ScriptedAnalyzer {
            frames,
            cursor: AtomicUsize::new(0),
        });
        let clock = Arc::new(FixedClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
        ProctoringEngine::new(Some(analyzer), clock, RiskWeights::default(), normaliser)
    }

    #[test]
    fn unknown_session_is_rejected() {
        let engine = engine_with(vec![], 20.0);
        assert!(matches!(
            engine.analyze_frame("missing", &jpeg_bytes()),
            Err(ProctoringError::UnknownSession(_))
        ));
    }

    #[test]
    fn start_monitoring_is_idempotent() {
        let engine = engine_with(
            vec![FrameObservations {
                face_count: 1,
                ..Default::default()
            }],
            20.0,
        );
        engine.start_monitoring("i1");
        engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        engine.start_monitoring("i1");
        let status = engine.get_status("i1").unwrap();
        assert_eq!(status.frame_count, 1);
    }

    #[test]
    fn malformed_frame_does_not_advance_the_counter() {
        let engine = engine_with(vec![], 20.0);
        engine.start_monitoring("i1");
        let result = engine.analyze_frame("i1", b"not an image");
        assert!(matches!(result, Err(ProctoringError::BadFrame(_))));
        assert_eq!(engine.get_status("i1").unwrap().frame_count, 0);
    }

    #[test]
    fn gaze_extreme_fires_after_three_consecutive_frames() {
        let frames = vec![
            FrameObservations {
                face_count: 1,
                gaze_deviation: Some(0.5),
                ..Default::default()
            };
            3
        ];
        let engine = engine_with(frames, 20.0);
        engine.start_monitoring("i1");
        engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        let result = engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        assert_eq!(result.detections.len(), 1);
        assert_eq!(result.detections[0].detection_type, DetectionType::GazeExtreme);
    }

    #[test]
    fn cell_phone_detection_fires_after_five_frames_above_confidence_floor() {
        let frame = FrameObservations {
            face_count: 1,
            objects: vec![ObjectObservation {
                object: WatchListObject::CellPhone,
                confidence: 0.9,
            }],
            ..Default::default()
        };
        let frames = vec![frame; 5];
        let engine = engine_with(frames, 20.0);
        engine.start_monitoring("i1");
        for _ in 0..4 {
            let result = engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
            assert!(result.detections.is_empty());
        }
        let result = engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        assert_eq!(result.detections.len(), 1);
        assert_eq!(result.detections[0].detection_type, DetectionType::CellPhone);
    }

    #[test]
    fn stop_monitoring_emits_a_final_report_and_clears_state() {
        let frames = vec![
            FrameObservations {
                face_count: 1,
                ..Default::default()
            };
            2
        ];
        let engine = engine_with(frames, 20.0);
        engine.start_monitoring("i1");
        engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        let report = engine.stop_monitoring("i1").unwrap();
        assert_eq!(report.total_frames, 2);
        assert!(matches!(
            engine.get_status("i1"),
            Err(ProctoringError::UnknownSession(_))
        ));
    }

    #[test]
    fn degraded_mode_reports_unavailable_without_failing() {
        let clock = Arc::new(FixedClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
        let engine = ProctoringEngine::new(None, clock, RiskWeights::default(), 20.0);
        engine.start_monitoring("i1");
        let result = engine.analyze_frame("i1", &jpeg_bytes()).unwrap();
        assert_eq!(result.risk_level, "unavailable");
        assert!(result.detections.is_empty());
    }
}
