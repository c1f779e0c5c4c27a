//! IntelliHire orchestration engine: adaptive question pipeline, proctoring
//! pipeline, and voice analysis pipeline behind a single HTTP surface (§1,
//! §2).

pub mod config;
pub mod db;
pub mod error;
pub mod evaluation;
pub mod fusion;
pub mod http;
pub mod llm;
pub mod proctoring;
pub mod questions;
pub mod rag;
pub mod session;
pub mod state;
pub mod text_metrics;
pub mod voice;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;

use config::Config;
use db::{init_database, Repository};
use evaluation::AnswerEvaluator;
use fusion::FusionEngine;
use llm::LlmClient;
use proctoring::ProctoringEngine;
use questions::QuestionGenerator;
use rag::RagService;
use session::SessionCoordinator;
use state::AppState;
use voice::{SttClient, VoiceAnalyzer};

/// Assemble every pipeline behind a `SessionCoordinator` and build the axum
/// router, without binding a socket. Exposed separately from `main` so
/// integration tests can mount the router directly (`tower::ServiceExt::oneshot`).
pub fn build_app(config: &Config) -> Result<(Router, Arc<Repository>)> {
    let conn = init_database(&config.database_path)?;
    let db = Arc::new(Repository::new(conn));
    let rag = Arc::new(RagService::new(db.clone(), config.embedding_model_dir.clone()));

    let llm = LlmClient::from_config(config)?;
    let questions = QuestionGenerator::new(llm.clone());
    let evaluator = AnswerEvaluator::new(llm.clone());
    let fusion = FusionEngine::new(llm);

    let stt = SttClient::from_config(config)?;
    let voice = VoiceAnalyzer::new(stt);

    let proctoring = Arc::new(ProctoringEngine::from_config(config));
    if !proctoring.is_available() && !config.allow_degraded_startup {
        anyhow::bail!("proctoring vision models failed to load and ALLOW_DEGRADED_STARTUP is not set");
    }

    let coordinator = Arc::new(SessionCoordinator::new(
        db.clone(),
        rag,
        questions,
        evaluator,
        voice,
        fusion,
        proctoring,
        config.followup_threshold,
    ));

    let router = http::build_router(AppState::new(coordinator));
    Ok((router, db))
}
