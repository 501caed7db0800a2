//! Qualitative resume analysis through the text generator.

pub mod analyzer;
pub mod handlers;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("A job description is required for analysis")]
    MissingJobDescription,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Could not encode resume: {0}")]
    Encode(serde_json::Error),
}
