//! Data models for database entities

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Job posting. Created once by an interviewer; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirements: String,
    /// Axis name -> weight in [0,1]. Not required to sum to 1.0 up front;
    /// fusion renormalises over the axes it can map (§4.7, §9).
    pub scoring_criteria: HashMap<String, f32>,
    pub interview_duration_minutes: i64,
    pub owner_id: String,
    pub created_at: String,
}

/// Interview lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Pending => "pending",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "in_progress" => InterviewStatus::InProgress,
            "completed" => InterviewStatus::Completed,
            "cancelled" => InterviewStatus::Cancelled,
            _ => InterviewStatus::Pending,
        }
    }
}

/// Candidate identity captured when an interview link is opened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Per-axis aggregates and qualitative summary produced by fusion (§4.7)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub axis_scores: HashMap<String, f32>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub grade: String,
    pub summary: String,
}

/// Interview (session) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    pub job_id: String,
    pub candidate: Candidate,
    pub cv_file_path: Option<String>,
    pub status: InterviewStatus,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub final_score: Option<f32>,
    pub ai_analysis: Option<AiAnalysis>,
    pub cv_monitoring_report: Option<serde_json::Value>,
    pub created_at: String,
}

/// Question category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Technical,
    Behavioral,
    Situational,
    General,
    Followup,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Technical => "technical",
            QuestionType::Behavioral => "behavioral",
            QuestionType::Situational => "situational",
            QuestionType::General => "general",
            QuestionType::Followup => "followup",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "technical" => QuestionType::Technical,
            "behavioral" => QuestionType::Behavioral,
            "situational" => QuestionType::Situational,
            "followup" => QuestionType::Followup,
            _ => QuestionType::General,
        }
    }
}

/// Question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// Question entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub interview_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub order_index: i64,
    pub parent_question_id: Option<String>,
    pub is_followup: bool,
    pub ai_context: Option<String>,
    pub created_at: String,
}

/// The four scoring axes produced for every response
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisScores {
    pub relevance: i32,
    pub technical: i32,
    pub communication: i32,
    pub confidence: i32,
}

impl AxisScores {
    pub fn mean(&self) -> f32 {
        (self.relevance + self.technical + self.communication + self.confidence) as f32 / 4.0
    }
}

/// Response entity. `id` is an autoincrementing integer, not a random id,
/// so that a candidate's responses take strictly increasing ids in
/// insertion order (§5 "Ordering guarantees").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: i64,
    pub interview_id: String,
    pub question_id: String,
    pub answer_text: String,
    pub answer_audio_ref: Option<String>,
    pub answer_duration_seconds: f32,
    pub scores: AxisScores,
    pub ai_feedback: String,
    pub voice_analysis: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

/// A single chunk of a candidate's CV, scoped to one interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvChunk {
    pub id: i64,
    pub interview_id: String,
    pub ordinal: i64,
    pub text: String,
    pub created_at: String,
}

/// Helper: new random entity id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper: current timestamp as ISO 8601 string
pub fn now() -> String {
    Utc::now().to_rfc3339()
}
