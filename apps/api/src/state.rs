use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::Config;
use crate::jobs::catalog::JobCatalog;
use crate::jobs::skill_extractor::SkillExtractor;
use crate::llm_client::TextGenerator;
use crate::parsing::ResumeParser;
use crate::render::DocumentRenderer;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// External collaborators sit behind traits so tests can swap them out.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resumes: Arc<dyn ResumeStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub llm: Arc<dyn TextGenerator>,
    pub skill_extractor: Arc<dyn SkillExtractor>,
    pub parser: ResumeParser,
    /// Loaded once at startup, read-only afterwards.
    pub catalog: Arc<JobCatalog>,
    /// `None` when no render service is configured.
    pub renderer: Option<Arc<dyn DocumentRenderer>>,
}
