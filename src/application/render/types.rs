use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::document::Document;

/// Where the document to render comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderSource {
    /// A document that has already been deserialised.
    Document(Document),
    /// Arbitrary JSON as received from the content API.
    Value(Value),
    /// Raw JSON text.
    Json(String),
}

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub source: RenderSource,
    /// Normalised public site URL used for same-origin checks during link classification.
    pub public_site_url: Option<String>,
}

impl RenderRequest {
    pub fn new(source: RenderSource) -> Self {
        Self {
            source,
            public_site_url: None,
        }
    }

    pub fn from_document(document: Document) -> Self {
        Self::new(RenderSource::Document(document))
    }

    pub fn from_value(value: Value) -> Self {
        Self::new(RenderSource::Value(value))
    }

    pub fn from_json(json: impl Into<String>) -> Self {
        Self::new(RenderSource::Json(json.into()))
    }

    pub fn with_public_site_url(mut self, public_site_url: impl Into<String>) -> Self {
        let normalized = normalize_public_site_url(public_site_url.into().as_str());
        if !normalized.is_empty() {
            self.public_site_url = Some(normalized);
        }
        self
    }
}

pub(crate) fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let without_trailing = trimmed.trim_end_matches('/');
    format!("{without_trailing}/")
}

/// Content-level metrics surfaced alongside rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentMetrics {
    pub word_count: u32,
    pub reading_time_minutes: u32,
    pub internal_links_count: u32,
    pub external_links_count: u32,
    pub images_count: u32,
    pub images_missing_alt: u32,
    pub code_blocks_count: u32,
    pub highlighted_code_blocks: u32,
    pub embeds_count: u32,
    /// Nodes dropped for missing required attributes, null slots, or depth.
    pub skipped_nodes: u32,
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    /// HTML ready for mounting; empty when the root was not a document.
    pub html: String,
    /// Whether the root was a renderable document.
    pub rendered: bool,
    /// Indicates whether the rendered HTML contains any code blocks.
    pub contains_code: bool,
    /// Indicates whether the rendered HTML contains embedded players.
    pub contains_embeds: bool,
    #[serde(default)]
    pub content_metrics: ContentMetrics,
}

impl RenderOutput {
    pub fn empty() -> Self {
        Self {
            html: String::new(),
            rendered: false,
            contains_code: false,
            contains_embeds: false,
            content_metrics: ContentMetrics::default(),
        }
    }
}

/// Structured errors surfaced by the rendering pipeline.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("document parsing failed: {message}")]
    Document { message: String },
}

/// Trait exposed by the rendering pipeline. Implementations must be pure and
/// deterministic: given the same input, they return identical outputs or errors.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_site_url_is_normalised_with_trailing_slash() {
        let request = RenderRequest::from_json("{}").with_public_site_url(" https://site.test// ");
        assert_eq!(request.public_site_url.as_deref(), Some("https://site.test/"));

        let blank = RenderRequest::from_json("{}").with_public_site_url("   ");
        assert_eq!(blank.public_site_url, None);
    }
}
