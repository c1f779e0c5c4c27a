//! Handler for the job-wide ranked report (§6, §4.7)

use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppResult;
use crate::fusion::rank_completed_interviews;
use crate::http::dto::ReportEntry;
use crate::state::AppState;

pub async fn job_report(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<Vec<ReportEntry>>> {
    let interviews = state.coordinator.db().list_completed_interviews_for_job(&job_id)?;
    let ranked = rank_completed_interviews(interviews);
    let entries = ranked
        .into_iter()
        .map(|interview| ReportEntry {
            candidate: interview.candidate,
            final_score: interview.final_score,
            grade: interview.ai_analysis.as_ref().map(|a| a.grade.clone()),
            ai_analysis: interview.ai_analysis,
            completed_at: interview.completed_at,
        })
        .collect();
    Ok(Json(entries))
}
