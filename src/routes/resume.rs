use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::resume_dto::{
        GenerateResumePayload, GenerateResumeResponse, ResumeListQuery, ResumeResponse,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/resumes",
    request_body = GenerateResumePayload,
    responses(
        (status = 200, description = "Resume generated and stored", body = Json<GenerateResumeResponse>),
        (status = 400, description = "Missing or malformed fields")
    )
)]
#[axum::debug_handler]
pub async fn generate_resume(
    State(state): State<AppState>,
    Json(payload): Json<GenerateResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (resume, report) = state.resume_service.generate(payload).await?;
    Ok(Json(GenerateResumeResponse {
        resume: ResumeResponse::from(resume),
        feedback: report.feedback,
        suggestions: report.suggestions,
    }))
}

#[utoipa::path(
    get,
    path = "/resumes",
    params(
        ("email" = String, Query, description = "Email the resumes were generated for")
    ),
    responses(
        (status = 200, description = "Resumes for the email, newest first", body = Json<Vec<ResumeResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_resumes(
    State(state): State<AppState>,
    Query(query): Query<ResumeListQuery>,
) -> Result<impl IntoResponse> {
    let resumes = state.resume_service.list_for_email(&query.email).await?;
    let items: Vec<ResumeResponse> = resumes.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/resumes/{id}/download",
    params(
        ("id" = Uuid, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "The rendered PDF document"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (buffer, filename) = state.resume_service.download(id).await?;
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
