//! Request/response bodies for the external HTTP interface (§6)

use serde::{Deserialize, Serialize};

use crate::db::models::{AiAnalysis, Candidate, Question, Response};
use crate::proctoring::{Detection, FinalReport};
use crate::voice::VoiceAnalysisResult;

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub job_id: String,
    pub candidate: Candidate,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub interview_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UploadCvResponse {
    pub ok: bool,
    pub chunks_indexed: usize,
}

#[derive(Debug, Serialize)]
pub struct QuestionSummary {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub order_index: i64,
}

impl From<Question> for QuestionSummary {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            question_type: q.question_type.as_str().to_string(),
            order_index: q.order_index,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub question_id: String,
    pub answer_text: String,
    pub audio_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponseBody {
    pub response: Response,
    pub followup_question: Option<Question>,
}

#[derive(Debug, Serialize)]
pub struct UploadAudioResponse {
    pub voice_analysis: VoiceAnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct CompleteInterviewResponse {
    pub final_score: Option<f32>,
    pub ai_analysis: Option<AiAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeFrameRequest {
    /// Base64-encoded JPEG, per §6's persisted/wire frame format.
    pub frame: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeFrameResponse {
    pub frame_number: u64,
    pub detections: Vec<Detection>,
    /// Same set as `detections`: the engine only retains detections that
    /// already crossed a state machine's alert threshold, so every
    /// detection returned for a frame is also a warning.
    pub warnings: Vec<Detection>,
    pub risk_score: f32,
    pub risk_level: String,
}

#[derive(Debug, Serialize)]
pub struct StopMonitoringResponse {
    pub final_report: FinalReport,
}

#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub candidate: Candidate,
    pub final_score: Option<f32>,
    pub grade: Option<String>,
    pub ai_analysis: Option<AiAnalysis>,
    pub completed_at: Option<String>,
}
