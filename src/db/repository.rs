//! Repository layer for database CRUD operations

use super::models::*;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::Mutex;

/// Repository for database operations
pub struct Repository {
    conn: Mutex<Connection>,
}

impl Repository {
    /// Create new repository instance
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    // ===== Job operations =====

    pub fn create_job(
        &self,
        title: String,
        description: String,
        requirements: String,
        scoring_criteria: HashMap<String, f32>,
        interview_duration_minutes: i64,
        owner_id: String,
    ) -> Result<Job> {
        let conn = self.conn.lock().unwrap();
        let id = new_id();
        let timestamp = now();
        let criteria_json = serde_json::to_string(&scoring_criteria)?;

        conn.execute(
            "INSERT INTO jobs (id, title, description, requirements, scoring_criteria, interview_duration_minutes, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![id, title, description, requirements, criteria_json, interview_duration_minutes, owner_id, timestamp],
        )?;

        Ok(Job {
            id,
            title,
            description,
            requirements,
            scoring_criteria,
            interview_duration_minutes,
            owner_id,
            created_at: timestamp,
        })
    }

    pub fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, title, description, requirements, scoring_criteria, interview_duration_minutes, owner_id, created_at
             FROM jobs WHERE id = ?1",
        )?;

        let job = stmt
            .query_row(params![job_id], Self::row_to_job)
            .optional()?;
        Ok(job)
    }

    fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<Job> {
        let criteria_json: String = row.get(4)?;
        let scoring_criteria: HashMap<String, f32> =
            serde_json::from_str(&criteria_json).unwrap_or_default();
        Ok(Job {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            requirements: row.get(3)?,
            scoring_criteria,
            interview_duration_minutes: row.get(5)?,
            owner_id: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    // ===== Interview operations =====

    pub fn create_interview(&self, job_id: String, candidate: Candidate) -> Result<Interview> {
        let conn = self.conn.lock().unwrap();
        let id = new_id();
        let timestamp = now();

        conn.execute(
            "INSERT INTO interviews (id, job_id, candidate_name, candidate_email, candidate_phone, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                job_id,
                candidate.name,
                candidate.email,
                candidate.phone,
                InterviewStatus::Pending.as_str(),
                timestamp
            ],
        )?;

        Ok(Interview {
            id,
            job_id,
            candidate,
            cv_file_path: None,
            status: InterviewStatus::Pending,
            started_at: None,
            completed_at: None,
            final_score: None,
            ai_analysis: None,
            cv_monitoring_report: None,
            created_at: timestamp,
        })
    }

    pub fn get_interview(&self, interview_id: &str) -> Result<Option<Interview>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, job_id, candidate_name, candidate_email, candidate_phone, cv_file_path,
                    status, started_at, completed_at, final_score, ai_analysis, cv_monitoring_report, created_at
             FROM interviews WHERE id = ?1",
        )?;

        let interview = stmt
            .query_row(params![interview_id], Self::row_to_interview)
            .optional()?;
        Ok(interview)
    }

    fn row_to_interview(row: &rusqlite::Row) -> rusqlite::Result<Interview> {
        let status_str: String = row.get(6)?;
        let ai_analysis_json: Option<String> = row.get(10)?;
        let monitoring_json: Option<String> = row.get(11)?;

        Ok(Interview {
            id: row.get(0)?,
            job_id: row.get(1)?,
            candidate: Candidate {
                name: row.get(2)?,
                email: row.get(3)?,
                phone: row.get(4)?,
            },
            cv_file_path: row.get(5)?,
            status: InterviewStatus::parse(&status_str),
            started_at: row.get(7)?,
            completed_at: row.get(8)?,
            final_score: row.get(9)?,
            ai_analysis: ai_analysis_json.and_then(|s| serde_json::from_str(&s).ok()),
            cv_monitoring_report: monitoring_json.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: row.get(12)?,
        })
    }

    pub fn set_interview_status(&self, interview_id: &str, status: InterviewStatus) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        match status {
            InterviewStatus::InProgress => {
                conn.execute(
                    "UPDATE interviews SET status = ?1, started_at = COALESCE(started_at, ?2) WHERE id = ?3",
                    params![status.as_str(), now(), interview_id],
                )?;
            }
            _ => {
                conn.execute(
                    "UPDATE interviews SET status = ?1 WHERE id = ?2",
                    params![status.as_str(), interview_id],
                )?;
            }
        }
        Ok(())
    }

    pub fn set_cv_file_path(&self, interview_id: &str, path: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE interviews SET cv_file_path = ?1 WHERE id = ?2",
            params![path, interview_id],
        )?;
        Ok(())
    }

    pub fn complete_interview(
        &self,
        interview_id: &str,
        final_score: f32,
        ai_analysis: &AiAnalysis,
        cv_monitoring_report: &serde_json::Value,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let analysis_json = serde_json::to_string(ai_analysis)?;
        let report_json = serde_json::to_string(cv_monitoring_report)?;

        conn.execute(
            "UPDATE interviews
             SET status = ?1, completed_at = ?2, final_score = ?3, ai_analysis = ?4, cv_monitoring_report = ?5
             WHERE id = ?6",
            params![
                InterviewStatus::Completed.as_str(),
                now(),
                final_score,
                analysis_json,
                report_json,
                interview_id
            ],
        )?;
        Ok(())
    }

    /// Completed interviews for a job, ordered by final_score desc, ties by completed_at asc
    pub fn list_completed_interviews_for_job(&self, job_id: &str) -> Result<Vec<Interview>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, job_id, candidate_name, candidate_email, candidate_phone, cv_file_path,
                    status, started_at, completed_at, final_score, ai_analysis, cv_monitoring_report, created_at
             FROM interviews
             WHERE job_id = ?1 AND status = 'completed'
             ORDER BY final_score DESC, completed_at ASC",
        )?;

        let interviews = stmt
            .query_map(params![job_id], Self::row_to_interview)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(interviews)
    }

    // ===== Question operations =====

    pub fn create_question(
        &self,
        interview_id: &str,
        text: String,
        question_type: QuestionType,
        difficulty: Difficulty,
        order_index: i64,
        parent_question_id: Option<String>,
        ai_context: Option<String>,
    ) -> Result<Question> {
        let conn = self.conn.lock().unwrap();
        let id = new_id();
        let timestamp = now();
        let is_followup = parent_question_id.is_some();

        conn.execute(
            "INSERT INTO questions (id, interview_id, text, type, difficulty, order_index, parent_question_id, is_followup, ai_context, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                interview_id,
                text,
                question_type.as_str(),
                difficulty.as_str(),
                order_index,
                parent_question_id,
                is_followup,
                ai_context,
                timestamp
            ],
        )?;

        Ok(Question {
            id,
            interview_id: interview_id.to_string(),
            text,
            question_type,
            difficulty,
            order_index,
            parent_question_id,
            is_followup,
            ai_context,
            created_at: timestamp,
        })
    }

    pub fn get_questions_for_interview(&self, interview_id: &str) -> Result<Vec<Question>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, interview_id, text, type, difficulty, order_index, parent_question_id, is_followup, ai_context, created_at
             FROM questions WHERE interview_id = ?1 ORDER BY order_index ASC",
        )?;

        let questions = stmt
            .query_map(params![interview_id], Self::row_to_question)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    pub fn get_question(&self, question_id: &str) -> Result<Option<Question>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, interview_id, text, type, difficulty, order_index, parent_question_id, is_followup, ai_context, created_at
             FROM questions WHERE id = ?1",
        )?;

        let question = stmt
            .query_row(params![question_id], Self::row_to_question)
            .optional()?;
        Ok(question)
    }

    fn row_to_question(row: &rusqlite::Row) -> rusqlite::Result<Question> {
        let type_str: String = row.get(3)?;
        let difficulty_str: String = row.get(4)?;
        Ok(Question {
            id: row.get(0)?,
            interview_id: row.get(1)?,
            text: row.get(2)?,
            question_type: QuestionType::parse(&type_str),
            difficulty: Difficulty::parse(&difficulty_str),
            order_index: row.get(5)?,
            parent_question_id: row.get(6)?,
            is_followup: row.get(7)?,
            ai_context: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    /// Highest order_index currently used by an interview's questions (0 if none)
    pub fn max_order_index(&self, interview_id: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let max: Option<i64> = conn.query_row(
            "SELECT MAX(order_index) FROM questions WHERE interview_id = ?1",
            params![interview_id],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    // ===== Response operations =====

    /// Insert a response, or overwrite the existing one for the same
    /// (interview_id, question_id) pair — this is what makes
    /// `submit_response` idempotent per question.
    pub fn upsert_response(
        &self,
        interview_id: &str,
        question_id: &str,
        answer_text: String,
        answer_audio_ref: Option<String>,
        answer_duration_seconds: f32,
        scores: AxisScores,
        ai_feedback: String,
        voice_analysis: Option<serde_json::Value>,
    ) -> Result<Response> {
        let conn = self.conn.lock().unwrap();
        let timestamp = now();
        let voice_json = voice_analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            "INSERT INTO responses (interview_id, question_id, answer_text, answer_audio_ref, answer_duration_seconds,
                                     relevance_score, technical_score, communication_score, confidence_score,
                                     ai_feedback, voice_analysis, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
             ON CONFLICT(interview_id, question_id) DO UPDATE SET
                answer_text = excluded.answer_text,
                answer_audio_ref = excluded.answer_audio_ref,
                answer_duration_seconds = excluded.answer_duration_seconds,
                relevance_score = excluded.relevance_score,
                technical_score = excluded.technical_score,
                communication_score = excluded.communication_score,
                confidence_score = excluded.confidence_score,
                ai_feedback = excluded.ai_feedback,
                voice_analysis = excluded.voice_analysis,
                updated_at = excluded.updated_at",
            params![
                interview_id,
                question_id,
                answer_text,
                answer_audio_ref,
                answer_duration_seconds,
                scores.relevance,
                scores.technical,
                scores.communication,
                scores.confidence,
                ai_feedback,
                voice_json,
                timestamp,
            ],
        )?;

        let id: i64 = conn.query_row(
            "SELECT id FROM responses WHERE interview_id = ?1 AND question_id = ?2",
            params![interview_id, question_id],
            |row| row.get(0),
        )?;

        Ok(Response {
            id,
            interview_id: interview_id.to_string(),
            question_id: question_id.to_string(),
            answer_text,
            answer_audio_ref,
            answer_duration_seconds,
            scores,
            ai_feedback,
            voice_analysis,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        })
    }

    pub fn get_response(&self, interview_id: &str, question_id: &str) -> Result<Option<Response>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, interview_id, question_id, answer_text, answer_audio_ref, answer_duration_seconds,
                    relevance_score, technical_score, communication_score, confidence_score,
                    ai_feedback, voice_analysis, created_at, updated_at
             FROM responses WHERE interview_id = ?1 AND question_id = ?2",
        )?;

        let response = stmt
            .query_row(params![interview_id, question_id], Self::row_to_response)
            .optional()?;
        Ok(response)
    }

    pub fn get_responses_for_interview(&self, interview_id: &str) -> Result<Vec<Response>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT r.id, r.interview_id, r.question_id, r.answer_text, r.answer_audio_ref, r.answer_duration_seconds,
                    r.relevance_score, r.technical_score, r.communication_score, r.confidence_score,
                    r.ai_feedback, r.voice_analysis, r.created_at, r.updated_at
             FROM responses r
             JOIN questions q ON q.id = r.question_id
             WHERE r.interview_id = ?1
             ORDER BY q.order_index ASC",
        )?;

        let responses = stmt
            .query_map(params![interview_id], Self::row_to_response)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(responses)
    }

    fn row_to_response(row: &rusqlite::Row) -> rusqlite::Result<Response> {
        let voice_json: Option<String> = row.get(11)?;
        Ok(Response {
            id: row.get(0)?,
            interview_id: row.get(1)?,
            question_id: row.get(2)?,
            answer_text: row.get(3)?,
            answer_audio_ref: row.get(4)?,
            answer_duration_seconds: row.get(5)?,
            scores: AxisScores {
                relevance: row.get(6)?,
                technical: row.get(7)?,
                communication: row.get(8)?,
                confidence: row.get(9)?,
            },
            ai_feedback: row.get(10)?,
            voice_analysis: voice_json.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    pub fn set_response_voice_analysis(
        &self,
        interview_id: &str,
        question_id: &str,
        voice_analysis: &serde_json::Value,
        new_communication_score: i32,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let voice_json = serde_json::to_string(voice_analysis)?;
        conn.execute(
            "UPDATE responses SET voice_analysis = ?1, communication_score = ?2, updated_at = ?3
             WHERE interview_id = ?4 AND question_id = ?5",
            params![voice_json, new_communication_score, now(), interview_id, question_id],
        )
        .context("failed to persist voice analysis")?;
        Ok(())
    }

    // ===== CV chunk operations (RAG index) =====

    pub fn insert_cv_chunk(
        &self,
        interview_id: &str,
        ordinal: i64,
        text: &str,
        embedding: &[f32],
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let timestamp = now();
        let embedding_bytes = bincode::serialize(embedding)?;

        conn.execute(
            "INSERT INTO cv_chunks (interview_id, ordinal, text, embedding, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![interview_id, ordinal, text, embedding_bytes, timestamp],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All chunk ids + embeddings scoped to one interview, for building the
    /// per-interview HNSW namespace.
    pub fn get_cv_chunk_embeddings(&self, interview_id: &str) -> Result<Vec<(i64, Vec<f32>)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, embedding FROM cv_chunks WHERE interview_id = ?1 ORDER BY ordinal ASC",
        )?;

        let rows = stmt
            .query_map(params![interview_id], |row| {
                let id: i64 = row.get(0)?;
                let embedding_bytes: Vec<u8> = row.get(1)?;
                let embedding: Vec<f32> = bincode::deserialize(&embedding_bytes)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                Ok((id, embedding))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_cv_chunk_by_id(&self, chunk_id: i64) -> Result<Option<CvChunk>> {
        let conn = self.conn.lock().unwrap();
        let chunk = conn
            .query_row(
                "SELECT id, interview_id, ordinal, text, created_at FROM cv_chunks WHERE id = ?1",
                params![chunk_id],
                |row| {
                    Ok(CvChunk {
                        id: row.get(0)?,
                        interview_id: row.get(1)?,
                        ordinal: row.get(2)?,
                        text: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(chunk)
    }

    pub fn count_cv_chunks(&self, interview_id: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cv_chunks WHERE interview_id = ?1",
            params![interview_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Drop a namespace's CV chunks entirely (purge lifecycle hook, §9 RAG scoping)
    pub fn purge_cv_chunks(&self, interview_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM cv_chunks WHERE interview_id = ?1",
            params![interview_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::init_database;

    fn test_repo() -> Repository {
        let conn = init_database(":memory:").unwrap();
        Repository::new(conn)
    }

    #[test]
    fn create_and_fetch_job() {
        let repo = test_repo();
        let mut criteria = HashMap::new();
        criteria.insert("technical".to_string(), 0.5);
        criteria.insert("communication".to_string(), 0.5);

        let job = repo
            .create_job(
                "Backend Engineer".to_string(),
                "desc".to_string(),
                "reqs".to_string(),
                criteria,
                45,
                "owner-1".to_string(),
            )
            .unwrap();

        let fetched = repo.get_job(&job.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Backend Engineer");
        assert_eq!(fetched.scoring_criteria.len(), 2);
    }

    #[test]
    fn missing_job_returns_none() {
        let repo = test_repo();
        assert!(repo.get_job("nonexistent").unwrap().is_none());
    }

    #[test]
    fn interview_lifecycle() {
        let repo = test_repo();
        let job = repo
            .create_job(
                "Role".to_string(),
                "d".to_string(),
                "r".to_string(),
                HashMap::new(),
                30,
                "owner".to_string(),
            )
            .unwrap();

        let interview = repo
            .create_interview(
                job.id.clone(),
                Candidate {
                    name: "Alice".to_string(),
                    email: "alice@example.com".to_string(),
                    phone: None,
                },
            )
            .unwrap();
        assert_eq!(interview.status, InterviewStatus::Pending);

        repo.set_interview_status(&interview.id, InterviewStatus::InProgress)
            .unwrap();
        let fetched = repo.get_interview(&interview.id).unwrap().unwrap();
        assert_eq!(fetched.status, InterviewStatus::InProgress);
        assert!(fetched.started_at.is_some());

        let analysis = AiAnalysis {
            axis_scores: HashMap::new(),
            strengths: vec!["clear communication".to_string()],
            weaknesses: vec![],
            grade: "A".to_string(),
            summary: "Strong candidate".to_string(),
        };
        repo.complete_interview(&interview.id, 91.0, &analysis, &serde_json::json!({}))
            .unwrap();

        let completed = repo.get_interview(&interview.id).unwrap().unwrap();
        assert_eq!(completed.status, InterviewStatus::Completed);
        assert_eq!(completed.final_score, Some(91.0));
        assert_eq!(completed.ai_analysis.unwrap().grade, "A");
    }

    #[test]
    fn response_upsert_is_idempotent_per_question() {
        let repo = test_repo();
        let job = repo
            .create_job(
                "Role".to_string(),
                "d".to_string(),
                "r".to_string(),
                HashMap::new(),
                30,
                "owner".to_string(),
            )
            .unwrap();
        let interview = repo
            .create_interview(
                job.id,
                Candidate {
                    name: "Bob".to_string(),
                    email: "bob@example.com".to_string(),
                    phone: None,
                },
            )
            .unwrap();
        let question = repo
            .create_question(
                &interview.id,
                "Tell me about yourself".to_string(),
                QuestionType::General,
                Difficulty::Easy,
                1,
                None,
                None,
            )
            .unwrap();

        let scores_first = AxisScores {
            relevance: 60,
            technical: 50,
            communication: 60,
            confidence: 55,
        };
        repo.upsert_response(
            &interview.id,
            &question.id,
            "first answer".to_string(),
            None,
            12.0,
            scores_first,
            "ok".to_string(),
            None,
        )
        .unwrap();

        let scores_second = AxisScores {
            relevance: 80,
            technical: 75,
            communication: 82,
            confidence: 78,
        };
        let updated = repo
            .upsert_response(
                &interview.id,
                &question.id,
                "revised answer".to_string(),
                None,
                15.0,
                scores_second,
                "better".to_string(),
                None,
            )
            .unwrap();

        let all = repo.get_responses_for_interview(&interview.id).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].answer_text, "revised answer");
        assert_eq!(all[0].id, updated.id);
    }

    #[test]
    fn response_ids_are_strictly_increasing_in_insertion_order() {
        let repo = test_repo();
        let job = repo
            .create_job("Role".to_string(), "d".to_string(), "r".to_string(), HashMap::new(), 30, "owner".to_string())
            .unwrap();
        let interview = repo
            .create_interview(
                job.id,
                Candidate {
                    name: "Bob".to_string(),
                    email: "bob@example.com".to_string(),
                    phone: None,
                },
            )
            .unwrap();
        let scores = AxisScores {
            relevance: 50,
            technical: 50,
            communication: 50,
            confidence: 50,
        };

        let mut ids = Vec::new();
        for i in 0..3 {
            let question = repo
                .create_question(&interview.id, format!("Question {i}"), QuestionType::General, Difficulty::Easy, i, None, None)
                .unwrap();
            let response = repo
                .upsert_response(&interview.id, &question.id, "answer".to_string(), None, 10.0, scores, "ok".to_string(), None)
                .unwrap();
            ids.push(response.id);
        }

        assert!(ids.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn cv_chunks_scoped_and_purgeable() {
        let repo = test_repo();
        let job = repo
            .create_job(
                "Role".to_string(),
                "d".to_string(),
                "r".to_string(),
                HashMap::new(),
                30,
                "owner".to_string(),
            )
            .unwrap();
        let interview = repo
            .create_interview(
                job.id,
                Candidate {
                    name: "Carol".to_string(),
                    email: "carol@example.com".to_string(),
                    phone: None,
                },
            )
            .unwrap();

        repo.insert_cv_chunk(&interview.id, 0, "chunk one", &[0.1, 0.2, 0.3])
            .unwrap();
        repo.insert_cv_chunk(&interview.id, 1, "chunk two", &[0.4, 0.5, 0.6])
            .unwrap();

        assert_eq!(repo.count_cv_chunks(&interview.id).unwrap(), 2);
        let embeddings = repo.get_cv_chunk_embeddings(&interview.id).unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].1, vec![0.1, 0.2, 0.3]);

        repo.purge_cv_chunks(&interview.id).unwrap();
        assert_eq!(repo.count_cv_chunks(&interview.id).unwrap(), 0);
    }
}
