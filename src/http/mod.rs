//! External HTTP interface (§6): the only way into the orchestration engine.
//! Every handler delegates straight to `SessionCoordinator` or
//! `ProctoringEngine`; this module owns routing, DTOs, and multipart
//! plumbing only.

pub mod dto;
pub mod interviews;
pub mod monitoring;
pub mod reports;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Bounded timeouts live on the outbound LLM/STT clients (§5), not here:
/// wrapping the whole router in `TimeoutLayer` would require handling its
/// fallible middleware error, which this service has no use for.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/interviews/start", post(interviews::start_interview))
        .route("/candidate/upload_cv", post(interviews::upload_cv))
        .route("/interviews/:id/questions", get(interviews::get_questions))
        .route("/interviews/:id/response", post(interviews::submit_response))
        .route("/interviews/:id/upload_audio", post(interviews::upload_audio))
        .route("/interviews/:id/complete", post(interviews::complete_interview))
        .route("/monitoring/start/:id", post(monitoring::start_monitoring))
        .route("/monitoring/analyze/:id", post(monitoring::analyze_frame))
        .route("/monitoring/status/:id", get(monitoring::monitoring_status))
        .route("/monitoring/stop/:id", post(monitoring::stop_monitoring))
        .route("/reports/job/:job_id", get(reports::job_report))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
