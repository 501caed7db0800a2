//! Resume persistence. Each aggregate is one row with the full resume in a
//! JSONB column, so a create or update is a single atomic write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::Resume;

pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored resume is not decodable: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A 1-based page of at most [`MAX_PER_PAGE`] items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u32,
    per_page: u32,
}

impl Page {
    pub fn new(page: u32, per_page: u32) -> Result<Self, StoreError> {
        if page == 0 {
            return Err(StoreError::InvalidPage("page starts at 1".to_string()));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(StoreError::InvalidPage(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(Self { page, per_page })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredResume {
    pub id: Uuid,
    pub owner_id: String,
    #[serde(flatten)]
    pub resume: Resume,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-scoped resume storage. A resume owned by someone else is
/// indistinguishable from one that does not exist.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create(&self, owner_id: &str, resume: &Resume) -> Result<StoredResume, StoreError>;
    async fn fetch(&self, owner_id: &str, id: Uuid) -> Result<StoredResume, StoreError>;
    async fn list(&self, owner_id: &str, page: Page) -> Result<Vec<StoredResume>, StoreError>;
    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        resume: &Resume,
    ) -> Result<StoredResume, StoreError>;
    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    owner_id: String,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for StoredResume {
    type Error = StoreError;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        Ok(StoredResume {
            id: row.id,
            owner_id: row.owner_id,
            resume: serde_json::from_value(row.data)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the connection pool and applies pending migrations.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn create(&self, owner_id: &str, resume: &Resume) -> Result<StoredResume, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, owner_id, title, data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, data, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&resume.title)
        .bind(serde_json::to_value(resume)?)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn fetch(&self, owner_id: &str, id: Uuid) -> Result<StoredResume, StoreError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, owner_id, data, created_at, updated_at
            FROM resumes
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?
        .try_into()
    }

    async fn list(&self, owner_id: &str, page: Page) -> Result<Vec<StoredResume>, StoreError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, owner_id, data, created_at, updated_at
            FROM resumes
            WHERE owner_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(StoredResume::try_from)
        .collect()
    }

    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        resume: &Resume,
    ) -> Result<StoredResume, StoreError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET title = $3, data = $4, updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&resume.title)
        .bind(serde_json::to_value(resume)?)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?
        .try_into()
    }

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
