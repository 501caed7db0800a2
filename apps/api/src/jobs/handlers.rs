use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::recommender::{recommend, JobRecommendation};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecommendationQuery {
    pub resume_id: Uuid,
}

#[derive(Serialize)]
pub struct RecommendationsResponse {
    pub resume_id: Uuid,
    pub recommendations: Vec<JobRecommendation>,
}

/// GET /api/v1/jobs/recommendations?resume_id=
pub async fn handle_recommendations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let stored = state.resumes.fetch(&user.user_id, params.resume_id).await?;
    let recommendations = recommend(
        &stored.resume.skill_names(),
        &stored.resume.target_job_description,
        &state.catalog,
        state.skill_extractor.as_ref(),
    )
    .await;

    Ok(Json(RecommendationsResponse {
        resume_id: params.resume_id,
        recommendations,
    }))
}
