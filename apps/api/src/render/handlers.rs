use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::render::{render_as, OutputFormat};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateQuery {
    pub format: Option<OutputFormat>,
}

/// POST /api/v1/resumes/:id/generate?format=docx|pdf
pub async fn handle_generate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<GenerateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let renderer = state
        .renderer
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Document generation is not configured".to_string()))?;
    let format = params.format.unwrap_or(OutputFormat::Docx);

    let stored = state.resumes.fetch(&user.user_id, id).await?;
    let document = render_as(renderer.as_ref(), &stored.resume, format).await?;
    info!("Generated {} for resume {id} ({} bytes)", format.as_str(), document.len());

    let disposition = format!("attachment; filename=\"resume-{id}.{}\"", format.as_str());
    Ok((
        [
            (header::CONTENT_TYPE, format.mime().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    ))
}
