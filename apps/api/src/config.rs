use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub jwt_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Overrides the job catalog bundled with the binary.
    pub job_catalog_path: Option<PathBuf>,
    /// Document generation is disabled when unset.
    pub render_service_url: Option<String>,
    /// Replaces the Jan 1 of the current year start-date placeholder.
    pub default_start_date: Option<NaiveDate>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            optional(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            jwt_secret: require("JWT_SECRET")?,
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            job_catalog_path: optional("JOB_CATALOG_PATH").map(PathBuf::from),
            render_service_url: optional("RENDER_SERVICE_URL"),
            default_start_date: optional("DEFAULT_START_DATE")
                .map(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d"))
                .transpose()
                .context("DEFAULT_START_DATE must be a YYYY-MM-DD date")?,
            max_upload_bytes: optional("MAX_UPLOAD_BYTES")
                .map(|v| v.trim().parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            anthropic_api_key: "test-key".to_string(),
            jwt_secret: "test-secret".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            job_catalog_path: None,
            render_service_url: None,
            default_start_date: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
