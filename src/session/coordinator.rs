//! Session Coordinator (§4.1): single entry point for every per-interview
//! operation; owns idempotency and per-interview locking (§5).

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::db::models::{Candidate, Difficulty, Interview, InterviewStatus, Question, QuestionType, Response};
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::evaluation::AnswerEvaluator;
use crate::fusion::FusionEngine;
use crate::proctoring::ProctoringEngine;
use crate::questions::QuestionGenerator;
use crate::rag::{cv_ingest::CvIngestError, RagError, RagService};
use crate::voice::{VoiceAnalysisResult, VoiceAnalyzer};

const INITIAL_QUESTION_COUNT: usize = 5;
const CV_RETRIEVAL_K: usize = 5;
const CV_CONTEXT_MAX_CHARS: usize = 2000;

/// Result of a successful `submit_response` call.
pub struct SubmitOutcome {
    pub response: Response,
    pub followup: Option<Question>,
}

/// Ties the adaptive question pipeline, proctoring pipeline, voice analysis
/// pipeline, and fusion together behind one per-interview lock, matching
/// the "single per-interview lock guarding mutable session state" design
/// in §9.
pub struct SessionCoordinator {
    db: Arc<Repository>,
    rag: Arc<RagService>,
    questions: QuestionGenerator,
    evaluator: AnswerEvaluator,
    voice: VoiceAnalyzer,
    fusion: FusionEngine,
    proctoring: Arc<ProctoringEngine>,
    followup_threshold: f32,
    locks: StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SessionCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: Arc<Repository>,
        rag: Arc<RagService>,
        questions: QuestionGenerator,
        evaluator: AnswerEvaluator,
        voice: VoiceAnalyzer,
        fusion: FusionEngine,
        proctoring: Arc<ProctoringEngine>,
        followup_threshold: f32,
    ) -> Self {
        Self {
            db,
            rag,
            questions,
            evaluator,
            voice,
            fusion,
            proctoring,
            followup_threshold,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    async fn lock_interview(&self, interview_id: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let handle = {
            let mut locks = self.locks.lock().unwrap();
            locks
                .entry(interview_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        handle.lock_owned().await
    }

    fn require_interview(&self, interview_id: &str) -> AppResult<Interview> {
        self.db
            .get_interview(interview_id)?
            .ok_or_else(|| AppError::NotFound(format!("interview {interview_id}")))
    }

    pub fn start_interview(&self, job_id: &str, candidate: Candidate) -> AppResult<Interview> {
        let job = self
            .db
            .get_job(job_id)?
            .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))?;
        Ok(self.db.create_interview(job.id, candidate)?)
    }

    /// Attaches a CV to an interview. `UnsupportedFormat` is a hard error;
    /// an empty or unembeddable document degrades the interview to
    /// CV-less question generation rather than failing the upload (§4.2).
    pub async fn ingest_cv(&self, interview_id: &str, file_path: &Path) -> AppResult<usize> {
        self.require_interview(interview_id)?;

        match self.rag.ingest_cv(interview_id, file_path).await {
            Ok(count) => {
                self.db.set_cv_file_path(interview_id, &file_path.to_string_lossy())?;
                Ok(count)
            }
            Err(err) => {
                if let Some(CvIngestError::UnsupportedFormat(format)) = err.downcast_ref::<CvIngestError>() {
                    return Err(AppError::UnsupportedFormat(format.clone()));
                }
                if matches!(err.downcast_ref::<CvIngestError>(), Some(CvIngestError::EmptyDocument))
                    || matches!(err.downcast_ref::<RagError>(), Some(RagError::IndexUnavailable))
                {
                    tracing::warn!("interview {interview_id} proceeding without CV grounding: {:#}", err);
                    return Ok(0);
                }
                Err(AppError::Internal(err))
            }
        }
    }

    /// Idempotent: returns the existing question set if one was already
    /// generated for this interview.
    pub async fn generate_initial_questions(&self, interview_id: &str) -> AppResult<Vec<Question>> {
        let _guard = self.lock_interview(interview_id).await;

        let interview = self.require_interview(interview_id)?;

        let existing = self.db.get_questions_for_interview(interview_id)?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let job = self
            .db
            .get_job(&interview.job_id)?
            .ok_or_else(|| AppError::NotFound(format!("job {}", interview.job_id)))?;

        let cv_context = self.retrieve_cv_context(interview_id, &job.description).await;

        let generated = self
            .questions
            .generate_initial_batch(&job.description, &job.requirements, cv_context.as_deref(), INITIAL_QUESTION_COUNT)
            .await
            .map_err(|err| AppError::GenerationFailed(err.to_string()))?;

        let mut persisted = Vec::with_capacity(generated.len());
        for (idx, question) in generated.into_iter().enumerate() {
            let saved = self.db.create_question(
                interview_id,
                question.text,
                question.question_type,
                question.difficulty,
                (idx + 1) as i64,
                None,
                cv_context.clone(),
            )?;
            persisted.push(saved);
        }

        Ok(persisted)
    }

    async fn retrieve_cv_context(&self, interview_id: &str, query: &str) -> Option<String> {
        if !self.rag.has_cv_chunks(interview_id) {
            return None;
        }
        match self.rag.retrieve(interview_id, query, CV_RETRIEVAL_K).await {
            Ok(results) if !results.is_empty() => Some(RagService::build_context(&results, CV_CONTEXT_MAX_CHARS)),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("CV retrieval unavailable for interview {interview_id}, continuing without it: {:#}", err);
                None
            }
        }
    }

    /// Idempotent per `(interview_id, question_id)`: a retry with the same
    /// pair overwrites the prior response and re-evaluates (§4.1).
    pub async fn submit_response(
        &self,
        interview_id: &str,
        question_id: &str,
        answer_text: &str,
        audio_ref: Option<String>,
    ) -> AppResult<SubmitOutcome> {
        let _guard = self.lock_interview(interview_id).await;

        let interview = self.require_interview(interview_id)?;
        if matches!(interview.status, InterviewStatus::Completed | InterviewStatus::Cancelled) {
            return Err(AppError::InvalidState(format!(
                "interview {interview_id} is {}",
                interview.status.as_str()
            )));
        }

        let question = self
            .db
            .get_question(question_id)?
            .ok_or_else(|| AppError::NotFound(format!("question {question_id}")))?;
        if question.interview_id != interview_id {
            return Err(AppError::ValidationFailed(format!(
                "question {question_id} does not belong to interview {interview_id}"
            )));
        }

        if interview.status == InterviewStatus::Pending {
            self.db.set_interview_status(interview_id, InterviewStatus::InProgress)?;
        }

        let job = self
            .db
            .get_job(&interview.job_id)?
            .ok_or_else(|| AppError::NotFound(format!("job {}", interview.job_id)))?;

        let evaluation = self
            .evaluator
            .evaluate(interview_id, question_id, &question.text, answer_text, &job.description)
            .await;

        let response = self.db.upsert_response(
            interview_id,
            question_id,
            answer_text.to_string(),
            audio_ref,
            0.0,
            evaluation.scores,
            evaluation.feedback,
            None,
        )?;

        let already_has_followup = self
            .db
            .get_questions_for_interview(interview_id)?
            .iter()
            .any(|q| q.parent_question_id.as_deref() == Some(question_id));

        let followup = if response.scores.mean() < self.followup_threshold && !already_has_followup {
            let generated = self
                .questions
                .generate_followup(&question.text, answer_text, response.scores)
                .await
                .map_err(|err| AppError::GenerationFailed(err.to_string()))?;

            let next_order = self.db.max_order_index(interview_id)? + 1;
            let saved = self.db.create_question(
                interview_id,
                generated.text,
                generated.question_type,
                generated.difficulty,
                next_order,
                Some(question.id.clone()),
                None,
            )?;
            Some(saved)
        } else {
            None
        };

        Ok(SubmitOutcome { response, followup })
    }

    /// Attaches audio to an already-submitted response. Blends the voice
    /// analyzer's clarity score into the response's stored communication
    /// score: `mean(evaluator_communication, clarity)` (§8 scenario 6). The
    /// evaluator's original communication score is preserved across
    /// re-uploads so repeated blending doesn't drift.
    pub async fn attach_audio(
        &self,
        interview_id: &str,
        question_id: &str,
        audio_bytes: Vec<u8>,
    ) -> AppResult<VoiceAnalysisResult> {
        let _guard = self.lock_interview(interview_id).await;

        self.require_interview(interview_id)?;
        let response = self
            .db
            .get_response(interview_id, question_id)?
            .ok_or_else(|| AppError::NotFound(format!("response for question {question_id}")))?;

        let text_communication_score = response
            .voice_analysis
            .as_ref()
            .and_then(|v| v.get("text_communication_score"))
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
            .unwrap_or(response.scores.communication);

        let voice = self.voice.analyze(audio_bytes).await;

        let new_communication = if voice.degraded {
            text_communication_score
        } else {
            ((text_communication_score as f32 + voice.clarity_score as f32) / 2.0).round() as i32
        };

        let stored = serde_json::json!({
            "text_communication_score": text_communication_score,
            "voice": voice,
        });

        self.db
            .set_response_voice_analysis(interview_id, question_id, &stored, new_communication)?;

        Ok(voice)
    }

    /// Transitions an interview to `completed`, stops proctoring, runs
    /// fusion, and persists the final score and analysis.
    pub async fn complete_interview(&self, interview_id: &str) -> AppResult<Interview> {
        let _guard = self.lock_interview(interview_id).await;

        let interview = self.require_interview(interview_id)?;
        if interview.status == InterviewStatus::Completed {
            return Err(AppError::InvalidState(format!("interview {interview_id} is already completed")));
        }

        let job = self
            .db
            .get_job(&interview.job_id)?
            .ok_or_else(|| AppError::NotFound(format!("job {}", interview.job_id)))?;
        let responses = self.db.get_responses_for_interview(interview_id)?;

        let proctoring_report = match self.proctoring.stop_monitoring(interview_id) {
            Ok(report) => serde_json::to_value(report).unwrap_or_else(|_| serde_json::json!({})),
            Err(_) => serde_json::json!({}),
        };

        let (final_score, analysis) = self.fusion.build_analysis(&job, &responses).await;

        self.db
            .complete_interview(interview_id, final_score, &analysis, &proctoring_report)?;

        self.require_interview(interview_id)
    }

    pub fn db(&self) -> &Arc<Repository> {
        &self.db
    }

    pub fn proctoring(&self) -> &Arc<ProctoringEngine> {
        &self.proctoring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::schema::init_database;
    use crate::llm::LlmClient;
    use crate::proctoring::ProctoringEngine as Proctoring;
    use crate::voice::SttClient;
    use std::collections::HashMap as StdHashMap;

    fn coordinator() -> SessionCoordinator {
        let config = Config::for_test();
        let conn = init_database(":memory:").unwrap();
        let db = Arc::new(Repository::new(conn));
        let rag = Arc::new(RagService::new(db.clone(), config.embedding_model_dir.clone()));
        let llm = LlmClient::from_config(&config).unwrap();
        let stt = SttClient::from_config(&config).unwrap();
        let proctoring = Arc::new(Proctoring::new(None, Arc::new(crate::proctoring::SystemClock), config.risk_weights, config.risk_normaliser));

        SessionCoordinator::new(
            db,
            rag,
            QuestionGenerator::new(llm.clone()),
            AnswerEvaluator::new(llm.clone()),
            VoiceAnalyzer::new(stt),
            FusionEngine::new(llm),
            proctoring,
            85.0,
        )
    }

    fn sample_job(coordinator: &SessionCoordinator) -> String {
        let mut criteria = StdHashMap::new();
        criteria.insert("technical_skills".to_string(), 0.5);
        criteria.insert("communication".to_string(), 0.5);
        coordinator
            .db
            .create_job(
                "Backend Engineer".to_string(),
                "Builds services".to_string(),
                "Rust experience".to_string(),
                criteria,
                45,
                "owner-1".to_string(),
            )
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn start_interview_fails_for_unknown_job() {
        let coordinator = coordinator();
        let result = coordinator.start_interview(
            "missing-job",
            Candidate {
                name: "A".to_string(),
                email: "a@example.com".to_string(),
                phone: None,
            },
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn submit_response_rejects_unknown_question() {
        let coordinator = coordinator();
        let job_id = sample_job(&coordinator);
        let interview = coordinator
            .start_interview(
                &job_id,
                Candidate {
                    name: "A".to_string(),
                    email: "a@example.com".to_string(),
                    phone: None,
                },
            )
            .unwrap();

        let result = coordinator.submit_response(&interview.id, "missing-question", "answer", None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn submit_response_rejects_question_from_another_interview() {
        let coordinator = coordinator();
        let job_id = sample_job(&coordinator);
        let candidate = || Candidate {
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            phone: None,
        };
        let interview_a = coordinator.start_interview(&job_id, candidate()).unwrap();
        let interview_b = coordinator.start_interview(&job_id, candidate()).unwrap();

        let question = coordinator
            .db
            .create_question(&interview_a.id, "Q1".to_string(), QuestionType::General, Difficulty::Easy, 1, None, None)
            .unwrap();

        let result = coordinator
            .submit_response(&interview_b.id, &question.id, "answer", None)
            .await;
        assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn complete_interview_is_not_reentrant() {
        let coordinator = coordinator();
        let job_id = sample_job(&coordinator);
        let interview = coordinator
            .start_interview(
                &job_id,
                Candidate {
                    name: "A".to_string(),
                    email: "a@example.com".to_string(),
                    phone: None,
                },
            )
            .unwrap();

        coordinator.complete_interview(&interview.id).await.unwrap();
        let second = coordinator.complete_interview(&interview.id).await;
        assert!(matches!(second, Err(AppError::InvalidState(_))));
    }
}
