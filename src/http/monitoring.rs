//! Handlers for the proctoring pipeline's HTTP surface (§6)

use axum::extract::{Path, State};
use axum::Json;
use base64::Engine as _;

use crate::error::{AppError, AppResult};
use crate::http::dto::{AnalyzeFrameRequest, AnalyzeFrameResponse, OkResponse, StopMonitoringResponse};
use crate::proctoring::MonitoringStatus;
use crate::state::AppState;

pub async fn start_monitoring(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> AppResult<Json<OkResponse>> {
    state.coordinator.proctoring().start_monitoring(&interview_id);
    Ok(Json(OkResponse { ok: true }))
}

pub async fn analyze_frame(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Json(req): Json<AnalyzeFrameRequest>,
) -> AppResult<Json<AnalyzeFrameResponse>> {
    let frame_bytes = base64::engine::general_purpose::STANDARD
        .decode(req.frame.as_bytes())
        .map_err(|err| AppError::BadFrame(err.to_string()))?;
    let analysis = state.coordinator.proctoring().analyze_frame(&interview_id, &frame_bytes)?;
    Ok(Json(AnalyzeFrameResponse {
        frame_number: analysis.frame_number,
        warnings: analysis.detections.clone(),
        detections: analysis.detections,
        risk_score: analysis.risk_score,
        risk_level: analysis.risk_level,
    }))
}

pub async fn monitoring_status(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> AppResult<Json<MonitoringStatus>> {
    let status = state.coordinator.proctoring().get_status(&interview_id)?;
    Ok(Json(status))
}

pub async fn stop_monitoring(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> AppResult<Json<StopMonitoringResponse>> {
    let final_report = state.coordinator.proctoring().stop_monitoring(&interview_id)?;
    Ok(Json(StopMonitoringResponse { final_report }))
}
