//! Job scorer: ranks catalog postings against a resume's skills and the
//! skills its target job description asks for.
//!
//! matchScore = round(100 × (0.7 × skillMatch + 0.3 × targetMatch), 2)
//! where skillMatch = |resume ∩ job| / |job| and
//! targetMatch = |target ∩ job| / |target|, each 0 on an empty denominator.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::jobs::catalog::{JobCatalog, JobPosting};
use crate::jobs::skill_extractor::SkillExtractor;

pub const MAX_RECOMMENDATIONS: usize = 5;
const RESUME_SKILL_WEIGHT: f64 = 0.7;
const TARGET_SKILL_WEIGHT: f64 = 0.3;

/// A posting with its score for one resume and job description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecommendation {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub match_score: f64,
}

/// Lowercased, trimmed, de-duplicated skill names.
pub fn skill_set<I, S>(skills: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn overlap_ratio(numerator_side: &HashSet<String>, denominator: &HashSet<String>) -> f64 {
    if denominator.is_empty() {
        return 0.0;
    }
    numerator_side.intersection(denominator).count() as f64 / denominator.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn score_posting(
    resume_skills: &HashSet<String>,
    target_skills: &HashSet<String>,
    posting: &JobPosting,
) -> f64 {
    let job_skills = skill_set(&posting.required_skills);
    let skill_match = overlap_ratio(resume_skills, &job_skills);
    let target_match = overlap_ratio(&job_skills, target_skills);
    round2(100.0 * (RESUME_SKILL_WEIGHT * skill_match + TARGET_SKILL_WEIGHT * target_match))
}

/// Scores every posting and keeps the best [`MAX_RECOMMENDATIONS`].
/// Equal scores keep catalog order.
pub fn rank(
    resume_skills: &HashSet<String>,
    target_skills: &HashSet<String>,
    catalog: &JobCatalog,
) -> Vec<JobRecommendation> {
    let mut scored: Vec<JobRecommendation> = catalog
        .postings()
        .iter()
        .map(|posting| JobRecommendation {
            match_score: score_posting(resume_skills, target_skills, posting),
            posting: posting.clone(),
        })
        .collect();

    // sort_by is stable, so ties stay in catalog order.
    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    scored.truncate(MAX_RECOMMENDATIONS);
    scored
}

/// Ranks the catalog for a resume. A failing skill extractor degrades the
/// score to resume-to-job overlap only; it never fails the request.
pub async fn recommend(
    resume_skills: &[String],
    job_description: &str,
    catalog: &JobCatalog,
    extractor: &dyn SkillExtractor,
) -> Vec<JobRecommendation> {
    let target_skills = match extractor.extract_skills(job_description).await {
        Ok(skills) => skill_set(&skills),
        Err(e) => {
            warn!("Job skill extraction failed, scoring on resume skills only: {e}");
            HashSet::new()
        }
    };

    let recommendations = rank(&skill_set(resume_skills), &target_skills, catalog);
    debug!(
        "Ranked {} postings, returning {}",
        catalog.len(),
        recommendations.len()
    );
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::llm_client::LlmError;

    fn posting(title: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            category: "Engineering".to_string(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            key_responsibilities: vec![],
        }
    }

    fn set(items: &[&str]) -> HashSet<String> {
        skill_set(items)
    }

    struct FixedSkills(Vec<&'static str>);

    #[async_trait]
    impl SkillExtractor for FixedSkills {
        async fn extract_skills(&self, _jd: &str) -> Result<HashSet<String>, LlmError> {
            Ok(set(&self.0))
        }
    }

    struct Unavailable;

    #[async_trait]
    impl SkillExtractor for Unavailable {
        async fn extract_skills(&self, _jd: &str) -> Result<HashSet<String>, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    #[test]
    fn test_score_combines_weighted_overlaps() {
        let job = posting("Backend", &["Python", "Go", "SQL", "Docker"]);
        // skillMatch = 2/4, targetMatch = 1/2
        let score = score_posting(&set(&["python", "go"]), &set(&["docker", "rust"]), &job);
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_case_insensitive() {
        let job = posting("Backend", &["PostgreSQL"]);
        assert!((score_posting(&set(&["postgresql"]), &HashSet::new(), &job) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_rounds_to_two_decimals() {
        let job = posting("Backend", &["a", "b", "c"]);
        let score = score_posting(&set(&["a"]), &HashSet::new(), &job);
        assert!((score - 23.33).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounds() {
        let jobs = [
            posting("Empty", &[]),
            posting("One", &["rust"]),
            posting("Many", &["rust", "go", "sql", "c"]),
        ];
        let skill_sets = [
            set(&[]),
            set(&["rust"]),
            set(&["rust", "go", "sql", "c", "python"]),
        ];
        for job in &jobs {
            for resume in &skill_sets {
                for target in &skill_sets {
                    let score = score_posting(resume, target, job);
                    assert!((0.0..=100.0).contains(&score), "{score} for {}", job.title);
                }
            }
        }
        let perfect = score_posting(&set(&["rust"]), &set(&["rust"]), &jobs[1]);
        assert!((perfect - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_job_skills_score_only_on_target_side() {
        let job = posting("Empty", &[]);
        assert_eq!(score_posting(&set(&["rust"]), &set(&["rust"]), &job), 0.0);
    }

    #[tokio::test]
    async fn test_degrades_to_resume_overlap_when_extractor_fails() {
        let catalog = JobCatalog::new(vec![
            posting("Backend", &["Python", "Go", "SQL"]),
            posting("Frontend", &["React", "CSS"]),
        ]);
        let resume = vec!["python".to_string(), "go".to_string()];

        let recs = recommend(&resume, "Backend role", &catalog, &Unavailable).await;
        for rec in &recs {
            let job = skill_set(&rec.posting.required_skills);
            let skill_match = overlap_ratio(&skill_set(&resume), &job);
            let expected = round2(100.0 * 0.7 * skill_match);
            assert!((rec.match_score - expected).abs() < 1e-9);
        }
        assert_eq!(recs[0].posting.title, "Backend");
        assert!((recs[0].match_score - 46.67).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_returns_top_five_descending() {
        // Resume covers i of 8 skills for posting i, so every score is distinct.
        let all = ["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8"];
        let postings: Vec<_> = (1..=8)
            .map(|i| {
                let mut skills: Vec<&str> = all[..i].to_vec();
                skills.extend(["x1", "x2", "x3", "x4", "x5", "x6", "x7", "x8"][..8 - i].iter());
                posting(&format!("Job {i}"), &skills)
            })
            .collect();
        let catalog = JobCatalog::new(postings);
        let resume: Vec<String> = all.iter().map(|s| s.to_string()).collect();

        let recs = recommend(&resume, "", &catalog, &FixedSkills(vec![])).await;
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert!(recs.windows(2).all(|w| w[0].match_score > w[1].match_score));
        let titles: Vec<_> = recs.iter().map(|r| r.posting.title.as_str()).collect();
        assert_eq!(titles, vec!["Job 8", "Job 7", "Job 6", "Job 5", "Job 4"]);
    }

    #[tokio::test]
    async fn test_ties_keep_catalog_order() {
        let catalog = JobCatalog::new(vec![
            posting("Alpha", &["rust"]),
            posting("Beta", &["go"]),
            posting("Gamma", &["rust"]),
            posting("Delta", &["rust"]),
        ]);
        let recs = recommend(
            &["rust".to_string()],
            "Rust role",
            &catalog,
            &FixedSkills(vec!["Rust"]),
        )
        .await;
        let titles: Vec<_> = recs.iter().map(|r| r.posting.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Gamma", "Delta", "Beta"]);
    }

    #[test]
    fn test_fewer_postings_than_limit() {
        let catalog = JobCatalog::new(vec![posting("Only", &["rust"])]);
        assert_eq!(rank(&HashSet::new(), &HashSet::new(), &catalog).len(), 1);
    }

    #[test]
    fn test_recommendation_serializes_flat() {
        let rec = JobRecommendation {
            posting: posting("Backend", &["Go"]),
            match_score: 70.0,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["title"], "Backend");
        assert_eq!(json["required_skills"][0], "Go");
        assert_eq!(json["match_score"], 70.0);
    }
}
