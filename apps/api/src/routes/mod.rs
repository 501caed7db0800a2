pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::jobs::handlers as jobs;
use crate::render::handlers as render;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/v1/resumes/upload",
            post(resumes::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list).post(resumes::handle_create),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        // Analysis
        .route("/api/v1/resumes/:id/analyze", post(analysis::handle_analyze))
        .route(
            "/api/v1/resumes/:id/job-titles",
            get(analysis::handle_job_titles),
        )
        // Document generation
        .route("/api/v1/resumes/:id/generate", post(render::handle_generate))
        // Jobs
        .route(
            "/api/v1/jobs/recommendations",
            get(jobs::handle_recommendations),
        )
        .with_state(state)
}
