use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const BUNDLED_CATALOG: &str = include_str!("../../data/job_catalog.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub category: String,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub key_responsibilities: Vec<String>,
}

/// Read-only job postings, loaded once at startup and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    postings: Vec<JobPosting>,
}

impl JobCatalog {
    pub fn new(postings: Vec<JobPosting>) -> Self {
        Self { postings }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let postings: Vec<JobPosting> =
            serde_json::from_str(json).context("Job catalog is not a valid JSON array of postings")?;
        Ok(Self::new(postings))
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Loads from `path` when given, otherwise the bundled catalog.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Could not read job catalog at {}", path.display()))?;
                Self::from_json(&json)
                    .with_context(|| format!("Invalid job catalog at {}", path.display()))?
            }
            None => Self::bundled()?,
        };
        if catalog.is_empty() {
            warn!("Job catalog is empty; recommendations will always be empty");
        }
        info!("Job catalog loaded: {} postings", catalog.len());
        Ok(catalog)
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
