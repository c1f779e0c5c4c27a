//! Per-frame computer-vision pipeline (§4.5 steps 1-4): face/iris landmarks,
//! gaze deviation, watch-list object detection, frame-difference movement.
//!
//! Inference lives behind the `FrameAnalyzer` trait so the engine's state
//! machine and risk accounting can be exercised without loading real models.

use image::{DynamicImage, GenericImageView};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;

use super::types::{FrameObservations, ObjectObservation, WatchListObject};

pub trait FrameAnalyzer: Send + Sync {
    fn analyze(&self, frame: &DynamicImage, previous: Option<&DynamicImage>) -> FrameObservations;
}

const FACE_MESH_INPUT_SIZE: u32 = 192;
const OBJECT_DETECTOR_INPUT_SIZE: u32 = 320;
const OBJECT_CONFIDENCE_FLOOR: f32 = 0.5;

/// COCO label indices this proctoring session cares about; everything else
/// the object detector reports is ignored.
fn watch_list_label(class_id: i64) -> Option<WatchListObject> {
    match class_id {
        67 => Some(WatchListObject::CellPhone),
        63 => Some(WatchListObject::Laptop),
        73 => Some(WatchListObject::Book),
        0 => Some(WatchListObject::AdditionalPerson),
        _ => None,
    }
}

/// ONNX-backed face mesh + object detection pipeline. `ort::Session` is not
/// `Sync` on its own interior-mutability path, so each model is guarded by a
/// `Mutex`; frames are analyzed one at a time per session anyway (§5 keys
/// proctoring state per interview).
pub struct OnnxFrameAnalyzer {
    face_mesh: Mutex<Session>,
    object_detector: Mutex<Session>,
}

impl OnnxFrameAnalyzer {
    pub fn load(face_mesh_path: &Path, object_detection_path: &Path) -> anyhow::Result<Self> {
        let face_mesh = Session::builder()?.commit_from_file(face_mesh_path)?;
        let object_detector = Session::builder()?.commit_from_file(object_detection_path)?;
        Ok(Self {
            face_mesh: Mutex::new(face_mesh),
            object_detector: Mutex::new(object_detector),
        })
    }

    fn run_face_mesh(&self, frame: &DynamicImage) -> anyhow::Result<(usize, Option<f32>)> {
        let tensor = to_nchw_tensor(frame, FACE_MESH_INPUT_SIZE);
        let mut session = self.face_mesh.lock().unwrap();
        let input_name = session.inputs()[0].name().to_string();
        let outputs = session.run(ort::inputs![input_name => Value::from_array(tensor)?])?;

        // Expected output layout: [face_count, landmarks...] where landmarks
        // include iris centers (indices 468/473 in a 478-point mesh) and a
        // handful of head-pose reference points. We only need the derived
        // gaze deviation, not the raw mesh, downstream.
        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        if data.is_empty() {
            return Ok((0, None));
        }

        let face_count = shape.first().copied().unwrap_or(0).max(0) as usize;
        if face_count == 0 {
            return Ok((0, None));
        }
        if face_count > 1 {
            return Ok((face_count, None));
        }

        let gaze_deviation = gaze_deviation_from_landmarks(data);
        Ok((face_count, Some(gaze_deviation)))
    }

    fn run_object_detection(&self, frame: &DynamicImage) -> anyhow::Result<Vec<ObjectObservation>> {
        let tensor = to_nchw_tensor(frame, OBJECT_DETECTOR_INPUT_SIZE);
        let mut session = self.object_detector.lock().unwrap();
        let input_name = session.inputs()[0].name().to_string();
        let outputs = session.run(ort::inputs![input_name => Value::from_array(tensor)?])?;

        // Expected output layout: rows of [class_id, confidence, x, y, w, h].
        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        let row_len = 6usize;
        let rows = shape.last().copied().unwrap_or(0).max(0) as usize / row_len.max(1);

        let mut detections = Vec::new();
        for row in 0..rows {
            let base = row * row_len;
            if base + 5 >= data.len() {
                break;
            }
            let class_id = data[base] as i64;
            let confidence = data[base + 1];
            if confidence < OBJECT_CONFIDENCE_FLOOR {
                continue;
            }
            if let Some(object) = watch_list_label(class_id) {
                detections.push(ObjectObservation { object, confidence });
            }
        }
        Ok(detections)
    }
}

impl FrameAnalyzer for OnnxFrameAnalyzer {
    fn analyze(&self, frame: &DynamicImage, previous: Option<&DynamicImage>) -> FrameObservations {
        let (face_count, gaze_deviation) = self.run_face_mesh(frame).unwrap_or((0, None));
        let objects = self.run_object_detection(frame).unwrap_or_default();
        let movement_score = previous.map(|prev| frame_difference_score(prev, frame)).unwrap_or(0.0);

        FrameObservations {
            face_count,
            gaze_deviation,
            objects,
            movement_score,
        }
    }
}

fn to_nchw_tensor(frame: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = frame.resize_exact(size, size, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();
    let mut tensor = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }
    tensor
}

/// Reduces a single-face landmark vector to the total gaze deviation
/// (`sqrt(horizontal^2 + vertical^2)`, §4.5 step 2). Horizontal deviation
/// comes from the iris-in-eye-corner ratio, vertical from the iris offset
/// against the nose-to-chin axis; both are normalized to roughly [0,1]
/// by the model's own coordinate space.
fn gaze_deviation_from_landmarks(landmarks: &[f32]) -> f32 {
    const LEFT_IRIS: usize = 468 * 3;
    const RIGHT_IRIS: usize = 473 * 3;
    const NOSE_TIP: usize = 1 * 3;
    const FACE_CENTRE: usize = 0 * 3;

    let get = |idx: usize, offset: usize| landmarks.get(idx + offset).copied().unwrap_or(0.0);

    let iris_x = (get(LEFT_IRIS, 0) + get(RIGHT_IRIS, 0)) / 2.0;
    let iris_y = (get(LEFT_IRIS, 1) + get(RIGHT_IRIS, 1)) / 2.0;
    let nose_x = get(NOSE_TIP, 0);
    let nose_y = get(NOSE_TIP, 1);
    let centre_x = get(FACE_CENTRE, 0);
    let centre_y = get(FACE_CENTRE, 1);

    let horizontal = (iris_x - centre_x).abs() + (nose_x - centre_x).abs() * 0.5;
    let vertical = (iris_y - centre_y).abs() + (nose_y - centre_y).abs() * 0.5;

    (horizontal.powi(2) + vertical.powi(2)).sqrt()
}

/// Mean absolute pixel difference between two frames, scaled to roughly
/// [0,1]. Frames are resized to a small common grid first so resolution
/// changes between calls don't skew the score.
fn frame_difference_score(previous: &DynamicImage, current: &DynamicImage) -> f32 {
    const GRID: u32 = 64;
    let prev = previous.resize_exact(GRID, GRID, image::imageops::FilterType::Nearest).to_luma8();
    let curr = current.resize_exact(GRID, GRID, image::imageops::FilterType::Nearest).to_luma8();

    let mut total_diff: u64 = 0;
    for (p, c) in prev.pixels().zip(curr.pixels()) {
        total_diff += (p[0] as i32 - c[0] as i32).unsigned_abs() as u64;
    }
    let pixel_count = (GRID * GRID) as f32;
    (total_diff as f32 / pixel_count) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn identical_frames_have_zero_movement() {
        let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([10, 10, 10])));
        assert_eq!(frame_difference_score(&frame, &frame), 0.0);
    }

    #[test]
    fn a_fully_changed_frame_scores_near_one() {
        let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([0, 0, 0])));
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([255, 255, 255])));
        assert!(frame_difference_score(&black, &white) > 0.95);
    }
}
