mod analysis;
mod auth;
mod config;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod parsing;
mod render;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtIdentity;
use crate::config::Config;
use crate::jobs::catalog::JobCatalog;
use crate::jobs::skill_extractor::LlmSkillExtractor;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::parsing::dates::DateDefaults;
use crate::parsing::nlp::RuleBasedNlp;
use crate::parsing::ResumeParser;
use crate::render::{DocumentRenderer, HttpRenderer};
use crate::resumes::store::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; missing required env vars abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Craft API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let resumes = Arc::new(PgResumeStore::connect(&config.database_url).await?);

    // Initialize LLM client
    let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Job catalog is read-only for the life of the process
    let catalog = Arc::new(JobCatalog::load(config.job_catalog_path.as_deref())?);

    let dates = config
        .default_start_date
        .map(DateDefaults::Fixed)
        .unwrap_or_default();
    let parser = ResumeParser::new(Arc::new(RuleBasedNlp), dates);

    let renderer = match &config.render_service_url {
        Some(url) => {
            info!("Document rendering via {url}");
            Some(Arc::new(HttpRenderer::new(url)?) as Arc<dyn DocumentRenderer>)
        }
        None => {
            warn!("RENDER_SERVICE_URL not set; document generation disabled");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        resumes,
        identity: Arc::new(JwtIdentity::new(&config.jwt_secret)),
        skill_extractor: Arc::new(LlmSkillExtractor::new(llm.clone())),
        llm,
        parser,
        catalog,
        renderer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
