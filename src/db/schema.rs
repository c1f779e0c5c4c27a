//! Database schema initialization and migrations

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

/// SQL statements for creating tables
const CREATE_TABLES_SQL: &str = r#"
-- Job postings, created once by an interviewer, immutable thereafter
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    requirements TEXT NOT NULL,
    scoring_criteria TEXT NOT NULL,
    interview_duration_minutes INTEGER NOT NULL,
    owner_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Interview sessions
CREATE TABLE IF NOT EXISTS interviews (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    candidate_name TEXT NOT NULL,
    candidate_email TEXT NOT NULL,
    candidate_phone TEXT,
    cv_file_path TEXT,
    status TEXT NOT NULL,
    started_at TEXT,
    completed_at TEXT,
    final_score REAL,
    ai_analysis TEXT,
    cv_monitoring_report TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (job_id) REFERENCES jobs(id)
);

-- Interview questions (initial batch + follow-ups)
CREATE TABLE IF NOT EXISTS questions (
    id TEXT PRIMARY KEY,
    interview_id TEXT NOT NULL,
    text TEXT NOT NULL,
    type TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    order_index INTEGER NOT NULL,
    parent_question_id TEXT,
    is_followup INTEGER NOT NULL,
    ai_context TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (interview_id) REFERENCES interviews(id),
    FOREIGN KEY (parent_question_id) REFERENCES questions(id)
);

-- Candidate responses, one row per question. Autoincrementing id so
-- responses for an interview sort in strictly increasing insertion order.
CREATE TABLE IF NOT EXISTS responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    interview_id TEXT NOT NULL,
    question_id TEXT NOT NULL,
    answer_text TEXT NOT NULL,
    answer_audio_ref TEXT,
    answer_duration_seconds REAL NOT NULL,
    relevance_score INTEGER NOT NULL,
    technical_score INTEGER NOT NULL,
    communication_score INTEGER NOT NULL,
    confidence_score INTEGER NOT NULL,
    ai_feedback TEXT NOT NULL,
    voice_analysis TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (interview_id) REFERENCES interviews(id),
    FOREIGN KEY (question_id) REFERENCES questions(id),
    UNIQUE (interview_id, question_id)
);

-- RAG chunk store: CV text chunks plus their embeddings, namespaced per interview
CREATE TABLE IF NOT EXISTS cv_chunks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    interview_id TEXT NOT NULL,
    ordinal INTEGER NOT NULL,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (interview_id) REFERENCES interviews(id)
);

CREATE INDEX IF NOT EXISTS idx_cv_chunks_interview ON cv_chunks(interview_id);
CREATE INDEX IF NOT EXISTS idx_questions_interview ON questions(interview_id);
CREATE INDEX IF NOT EXISTS idx_responses_interview ON responses(interview_id);
CREATE INDEX IF NOT EXISTS idx_interviews_job ON interviews(job_id);
"#;

/// Initialize database and create tables
///
/// # Arguments
/// * `db_path` - Path to the database file (or `:memory:` for tests)
///
/// # Returns
/// * `Ok(Connection)` - Database connection if successful
/// * `Err` - Error if initialization fails
pub fn init_database(db_path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(db_path.as_ref())?;

    // Execute schema creation
    conn.execute_batch(CREATE_TABLES_SQL)?;

    // Enable foreign keys
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    Ok(conn)
}
