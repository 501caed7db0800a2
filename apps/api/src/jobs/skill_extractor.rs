use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::jobs::prompts::build_skill_extraction_prompt;
use crate::llm_client::prompts::PLAIN_LIST_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};

/// Derives the set of skills a job description asks for.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract_skills(&self, job_description: &str) -> Result<HashSet<String>, LlmError>;
}

/// Asks the text generator for a newline-delimited skill list.
pub struct LlmSkillExtractor {
    llm: Arc<dyn TextGenerator>,
}

impl LlmSkillExtractor {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract_skills(&self, job_description: &str) -> Result<HashSet<String>, LlmError> {
        if job_description.trim().is_empty() {
            return Ok(HashSet::new());
        }
        let prompt = build_skill_extraction_prompt(job_description);
        let reply = self.llm.generate(&prompt, PLAIN_LIST_SYSTEM).await?;
        Ok(parse_skill_lines(&reply))
    }
}

/// One skill per line, lowercased and trimmed. List markers the model adds
/// anyway are dropped.
pub fn parse_skill_lines(reply: &str) -> HashSet<String> {
    reply
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .to_lowercase()
        })
        .filter(|line| !line.is_empty())
        .collect()
}
