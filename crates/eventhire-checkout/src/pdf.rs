//! PDF conversion collaborator.
//!
//! Converts a rendered HTML document into PDF bytes through an external
//! rendering service. The document service treats every failure here as a
//! cue to fall back to the HTML body, so the trait's errors never reach an
//! end user directly.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the PDF conversion collaborator.
#[derive(Debug, Error)]
pub enum PdfError {
    /// HTTP transport or deserialization failure.
    #[error("pdf conversion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered without a usable document.
    #[error("pdf service returned no document: {0}")]
    NoDocument(String),
}

/// Converts HTML to PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, PdfError>;
}

// =============================================================================
// Hosted Conversion Client
// =============================================================================

const CONVERT_ENDPOINT: &str = "https://hcti.io/v1/image";

/// Client for a hosted HTML-to-PDF conversion service.
///
/// The service renders the submitted HTML and answers with a URL the
/// finished document can be downloaded from.
#[derive(Debug, Clone)]
pub struct HtmlToPdfClient {
    api_key: String,
    http: Client,
}

impl HtmlToPdfClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        HtmlToPdfClient {
            api_key: api_key.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PdfRenderer for HtmlToPdfClient {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        let body = serde_json::json!({
            "html": html,
            "format": "pdf",
            "viewport_width": 800,
            "viewport_height": 1200,
        });

        let response = self
            .http
            .post(CONVERT_ENDPOINT)
            .basic_auth(&self.api_key, Some(""))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PdfError::NoDocument(format!(
                "conversion failed with status {status}: {text}"
            )));
        }

        let parsed: ConvertResponse = response.json().await?;
        let Some(url) = parsed.url else {
            return Err(PdfError::NoDocument("response carried no document URL".to_string()));
        };

        // Download the finished document.
        let document = self.http.get(&url).send().await?.bytes().await?;

        Ok(document.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    url: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
