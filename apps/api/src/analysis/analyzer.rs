use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{build_analysis_prompt, build_job_titles_prompt};
use crate::analysis::AnalysisError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, TextGenerator};
use crate::models::resume::Resume;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAlignment {
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementImprovement {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub suggested: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsFeedback {
    #[serde(default)]
    pub relevant_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Qualitative feedback on a resume for one job description.
/// Every field tolerates being left out by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default)]
    pub keyword_alignment: KeywordAlignment,
    #[serde(default)]
    pub achievement_improvements: Vec<AchievementImprovement>,
    #[serde(default)]
    pub skills_feedback: SkillsFeedback,
    #[serde(default)]
    pub overall_recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JobTitles {
    #[serde(default)]
    job_titles: Vec<String>,
}

/// Asks the model for feedback. There is no degraded answer, so any
/// collaborator failure is returned to the caller.
pub async fn analyze(
    llm: &dyn TextGenerator,
    resume: &Resume,
    job_description: &str,
) -> Result<ResumeAnalysis, AnalysisError> {
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Err(AnalysisError::MissingJobDescription);
    }

    let resume_json = serde_json::to_string_pretty(resume).map_err(AnalysisError::Encode)?;
    let prompt = build_analysis_prompt(&resume_json, job_description);
    let analysis: ResumeAnalysis = call_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;

    info!(
        "Resume analysis: {} missing keywords, {} recommendations",
        analysis.keyword_alignment.missing_keywords.len(),
        analysis.overall_recommendations.len()
    );
    Ok(analysis)
}

pub async fn suggest_job_titles(
    llm: &dyn TextGenerator,
    resume: &Resume,
) -> Result<Vec<String>, AnalysisError> {
    let resume_json = serde_json::to_string_pretty(resume).map_err(AnalysisError::Encode)?;
    let prompt = build_job_titles_prompt(&resume_json);
    let titles: JobTitles = call_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;

    Ok(titles
        .job_titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}
