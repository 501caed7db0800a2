use std::collections::BTreeSet;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{Resume, SectionLabel};
use crate::parsing::extractor::RawDocument;
use crate::parsing::outcome::SkippedFragment;
use crate::resumes::store::{Page, StoredResume, DEFAULT_PER_PAGE};
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub resume: StoredResume,
    pub missing_sections: BTreeSet<SectionLabel>,
    pub feedback: Vec<String>,
    pub skipped_fragments: Vec<SkippedFragment>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<StoredResume>,
    pub page: u32,
    pub per_page: u32,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart upload: {}", e.body_text()))
}

/// Hand-entered resumes need a title and a target job description.
fn validate_resume(resume: &Resume) -> Result<(), AppError> {
    if resume.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if resume.target_job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "target_job_description is required".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/resumes/upload
///
/// Multipart form with a `file` (PDF or DOCX) and a `job_description`.
pub async fn handle_upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut file: Option<(Bytes, String)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let mime = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((bytes, mime));
            }
            Some("job_description") => {
                job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (bytes, mime) =
        file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let document = RawDocument::new(bytes, &mime)?;
    info!(
        "Parsing {:?} upload for user {} ({} bytes)",
        document.media_type(),
        user.user_id,
        document.size_bytes()
    );

    // Extraction is blocking file and CPU work.
    let parser = state.parser.clone();
    let jd = job_description.clone();
    let parsed = tokio::task::spawn_blocking(move || parser.parse_document(&document, &jd))
        .await
        .map_err(|e| AppError::ExtractionFailure(format!("Extraction task failed: {e}")))??;

    let stored = state.resumes.create(&user.user_id, &parsed.resume).await?;
    info!("Stored uploaded resume {}", stored.id);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            missing_sections: stored.resume.missing_sections.clone(),
            resume: stored,
            feedback: parsed.feedback,
            skipped_fragments: parsed.skipped_fragments,
        }),
    ))
}

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut resume): Json<Resume>,
) -> Result<(StatusCode, Json<StoredResume>), AppError> {
    validate_resume(&resume)?;
    resume.refresh_missing_sections();
    let stored = state.resumes.create(&user.user_id, &resume).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/v1/resumes?page=&per_page=
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PageQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let page_number = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    let page = Page::new(page_number, per_page)?;
    let resumes = state.resumes.list(&user.user_id, page).await?;
    Ok(Json(ResumeListResponse {
        resumes,
        page: page_number,
        per_page,
    }))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredResume>, AppError> {
    Ok(Json(state.resumes.fetch(&user.user_id, id).await?))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut resume): Json<Resume>,
) -> Result<Json<StoredResume>, AppError> {
    validate_resume(&resume)?;
    resume.refresh_missing_sections();
    Ok(Json(state.resumes.update(&user.user_id, id, &resume).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete(&user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
