use std::collections::BTreeSet;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::analyzer::{analyze, suggest_job_titles, ResumeAnalysis};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::SectionLabel;
use crate::parsing::assembler::section_feedback;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// Falls back to the resume's stored target job description.
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub resume_id: Uuid,
    pub analysis: ResumeAnalysis,
    pub missing_sections: BTreeSet<SectionLabel>,
    pub feedback: Vec<String>,
}

#[derive(Serialize)]
pub struct JobTitlesResponse {
    pub resume_id: Uuid,
    pub job_titles: Vec<String>,
}

/// POST /api/v1/resumes/:id/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<AnalyzeRequest>>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let stored = state.resumes.fetch(&user.user_id, id).await?;
    let Json(req) = body.unwrap_or_default();
    let job_description = req
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .unwrap_or_else(|| stored.resume.target_job_description.clone());

    let analysis = analyze(state.llm.as_ref(), &stored.resume, &job_description).await?;
    let missing_sections = stored.resume.missing_sections.clone();
    let feedback = section_feedback(&missing_sections);

    Ok(Json(AnalyzeResponse {
        resume_id: id,
        analysis,
        missing_sections,
        feedback,
    }))
}

/// GET /api/v1/resumes/:id/job-titles
pub async fn handle_job_titles(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JobTitlesResponse>, AppError> {
    let stored = state.resumes.fetch(&user.user_id, id).await?;
    let job_titles = suggest_job_titles(state.llm.as_ref(), &stored.resume).await?;
    Ok(Json(JobTitlesResponse {
        resume_id: id,
        job_titles,
    }))
}
