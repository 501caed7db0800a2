//! Document generation. Rendering is delegated to an external service behind
//! [`DocumentRenderer`]; a PDF is produced by rendering DOCX and converting it.

pub mod handlers;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::Resume;

const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Render service returned an empty document")]
    EmptyDocument,
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, resume: &Resume, format: OutputFormat) -> Result<Bytes, RenderError>;
    async fn convert(
        &self,
        document: Bytes,
        from: OutputFormat,
        to: OutputFormat,
    ) -> Result<Bytes, RenderError>;
}

/// Produces `resume` in `format`. PDF goes through DOCX first.
pub async fn render_as(
    renderer: &dyn DocumentRenderer,
    resume: &Resume,
    format: OutputFormat,
) -> Result<Bytes, RenderError> {
    let docx = renderer.render(resume, OutputFormat::Docx).await?;
    match format {
        OutputFormat::Docx => Ok(docx),
        OutputFormat::Pdf => {
            renderer
                .convert(docx, OutputFormat::Docx, OutputFormat::Pdf)
                .await
        }
    }
}

/// Client for the render service at `RENDER_SERVICE_URL`.
pub struct HttpRenderer {
    client: Client,
    base_url: String,
}

impl HttpRenderer {
    pub fn new(base_url: &str) -> Result<Self, RenderError> {
        Ok(Self {
            client: Client::builder().timeout(RENDER_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn read_document(response: reqwest::Response) -> Result<Bytes, RenderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Render service returned {status}: {message}");
            return Err(RenderError::Service {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(RenderError::EmptyDocument);
        }
        debug!("Render service returned {} bytes", body.len());
        Ok(body)
    }
}

#[async_trait]
impl DocumentRenderer for HttpRenderer {
    async fn render(&self, resume: &Resume, format: OutputFormat) -> Result<Bytes, RenderError> {
        let response = self
            .client
            .post(format!("{}/render/{}", self.base_url, format.as_str()))
            .json(resume)
            .send()
            .await?;
        Self::read_document(response).await
    }

    async fn convert(
        &self,
        document: Bytes,
        from: OutputFormat,
        to: OutputFormat,
    ) -> Result<Bytes, RenderError> {
        let response = self
            .client
            .post(format!("{}/convert", self.base_url))
            .query(&[("from", from.as_str()), ("to", to.as_str())])
            .header(reqwest::header::CONTENT_TYPE, from.mime())
            .body(document)
            .send()
            .await?;
        Self::read_document(response).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records each call and answers with a tag naming the produced format.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DocumentRenderer for RecordingRenderer {
        async fn render(&self, resume: &Resume, format: OutputFormat) -> Result<Bytes, RenderError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("render:{}:{}", format.as_str(), resume.title));
            Ok(Bytes::from(format.as_str().to_string()))
        }

        async fn convert(
            &self,
            document: Bytes,
            from: OutputFormat,
            to: OutputFormat,
        ) -> Result<Bytes, RenderError> {
            assert_eq!(document, Bytes::from(from.as_str().to_string()));
            self.calls
                .lock()
                .unwrap()
                .push(format!("convert:{}->{}", from.as_str(), to.as_str()));
            Ok(Bytes::from(to.as_str().to_string()))
        }
    }
}
