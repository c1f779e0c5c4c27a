//! Handlers for interview lifecycle, CV upload, questions, responses, and
//! audio attachment (§6)

use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, State};
use axum::Json;

use crate::db::models::new_id;
use crate::error::{AppError, AppResult};
use crate::http::dto::{
    CompleteInterviewResponse, QuestionSummary, StartInterviewRequest, StartInterviewResponse,
    SubmitResponseBody, SubmitResponseRequest, UploadAudioResponse, UploadCvResponse,
};
use crate::state::AppState;

pub async fn start_interview(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> AppResult<Json<StartInterviewResponse>> {
    let interview = state.coordinator.start_interview(&req.job_id, req.candidate)?;
    Ok(Json(StartInterviewResponse {
        interview_id: interview.id,
        status: interview.status.as_str().to_string(),
    }))
}

async fn read_multipart_field(
    field: axum::extract::multipart::Field<'_>,
) -> AppResult<Vec<u8>> {
    field
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|err| AppError::ValidationFailed(err.to_string()))
}

/// `interview_id` travels as a form field rather than a path segment: the
/// endpoint itself has no `{id}` segment (§6).
pub async fn upload_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadCvResponse>> {
    let mut interview_id: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::ValidationFailed(err.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "interview_id" => {
                interview_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| AppError::ValidationFailed(err.to_string()))?,
                );
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                file_bytes = Some(read_multipart_field(field).await?);
            }
            _ => {}
        }
    }

    let interview_id =
        interview_id.ok_or_else(|| AppError::ValidationFailed("missing interview_id field".into()))?;
    let file_bytes =
        file_bytes.ok_or_else(|| AppError::ValidationFailed("missing file field".into()))?;

    let extension = file_name
        .as_deref()
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .unwrap_or("txt")
        .to_string();
    let staging_path = std::env::temp_dir().join(format!("cv-{}-{}.{extension}", interview_id, new_id()));

    tokio::fs::write(&staging_path, &file_bytes)
        .await
        .map_err(|err| AppError::Internal(err.into()))?;
    let outcome = state.coordinator.ingest_cv(&interview_id, &staging_path).await;
    let _ = tokio::fs::remove_file(&staging_path).await;

    let chunks_indexed = outcome?;
    Ok(Json(UploadCvResponse {
        ok: true,
        chunks_indexed,
    }))
}

pub async fn get_questions(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> AppResult<Json<Vec<QuestionSummary>>> {
    let questions = state.coordinator.generate_initial_questions(&interview_id).await?;
    Ok(Json(questions.into_iter().map(QuestionSummary::from).collect()))
}

pub async fn submit_response(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Json(req): Json<SubmitResponseRequest>,
) -> AppResult<Json<SubmitResponseBody>> {
    let outcome = state
        .coordinator
        .submit_response(&interview_id, &req.question_id, &req.answer_text, req.audio_ref)
        .await?;
    Ok(Json(SubmitResponseBody {
        response: outcome.response,
        followup_question: outcome.followup,
    }))
}

pub async fn upload_audio(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadAudioResponse>> {
    let mut question_id: Option<String> = None;
    let mut audio_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::ValidationFailed(err.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "question_id" => {
                question_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| AppError::ValidationFailed(err.to_string()))?,
                );
            }
            "file" => audio_bytes = Some(read_multipart_field(field).await?),
            _ => {}
        }
    }

    let question_id =
        question_id.ok_or_else(|| AppError::ValidationFailed("missing question_id field".into()))?;
    let audio_bytes =
        audio_bytes.ok_or_else(|| AppError::ValidationFailed("missing file field".into()))?;

    let voice_analysis = state
        .coordinator
        .attach_audio(&interview_id, &question_id, audio_bytes)
        .await?;
    Ok(Json(UploadAudioResponse { voice_analysis }))
}

pub async fn complete_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> AppResult<Json<CompleteInterviewResponse>> {
    let interview = state.coordinator.complete_interview(&interview_id).await?;
    Ok(Json(CompleteInterviewResponse {
        final_score: interview.final_score,
        ai_analysis: interview.ai_analysis,
    }))
}
