mod embeds;
mod highlight;
mod parse;
mod sanitizer;
mod walker;

use std::{borrow::Cow, num::NonZeroUsize, sync::Arc};

use once_cell::sync::{Lazy, OnceCell};
use syntect::{dumps::from_uncompressed_data, parsing::SyntaxSet};
use thiserror::Error;
use tracing::debug;

use crate::{
    application::render::{
        markup::{Element, Markup, render_html},
        types::{
            RenderError, RenderOutput, RenderRequest, RenderService, RenderSource,
            normalize_public_site_url,
        },
    },
    domain::document::{Document, Node},
};

pub use highlight::{HighlightError, Highlighter, PlainTextHighlighter, SyntectHighlighter};

use sanitizer::build_document_sanitizer;
use parse::parse_document_json;
use walker::DocumentWalker;

pub const DEFAULT_MAX_DEPTH: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(depth) => depth,
    None => unreachable!(),
};
pub const DEFAULT_CONTAINER_CLASS: &str = "prose prose-content dark:prose-invert max-w-none";

const THEME_CSS: &str = include_str!(env!("SYNTAX_THEME_CSS_FILE"));

/// Document renderer with syntect highlighting and ammonia sanitisation.
pub struct DocumentRenderService {
    highlighter: Box<dyn Highlighter>,
    sanitizer: ammonia::Builder<'static>,
    config: RenderPipelineConfig,
}

impl DocumentRenderService {
    /// Build a renderer over the bundled syntax pack.
    fn new() -> Self {
        let syntax_bytes = include_bytes!(env!("SYNTAX_PACK_FILE"));
        let syntax_set: SyntaxSet =
            from_uncompressed_data(syntax_bytes).expect("syntax pack must be valid");
        Self::with_highlighter(SyntectHighlighter::new(syntax_set), active_render_config())
    }

    pub fn with_highlighter(
        highlighter: impl Highlighter + 'static,
        config: RenderPipelineConfig,
    ) -> Self {
        Self {
            highlighter: Box::new(highlighter),
            sanitizer: build_document_sanitizer(),
            config,
        }
    }

    pub fn config(&self) -> &RenderPipelineConfig {
        &self.config
    }

    /// Render the top-level nodes of a `doc` root. `None` for any other root.
    pub fn render_document(&self, document: Option<&Document>) -> Option<Vec<Markup>> {
        self.walker(None).render_document(document)
    }

    /// Render a single node. `None` when the node produces no output.
    pub fn render_node(&self, node: Option<&Node>) -> Option<Markup> {
        self.walker(None).render_node(node)
    }

    /// Render without the sanitisation stage regardless of configuration.
    pub fn render_unsanitized(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        self.run(request, false)
    }

    /// Language tokens the configured highlighter understands.
    pub fn languages(&self) -> Vec<String> {
        self.highlighter.languages()
    }

    fn walker(&self, public_site_url: Option<&str>) -> DocumentWalker<'_> {
        DocumentWalker::new(self.highlighter.as_ref(), self.config.max_depth.get())
            .with_public_site_url(public_site_url.or(self.config.public_site_url.as_deref()))
    }

    fn run(&self, request: &RenderRequest, sanitize: bool) -> Result<RenderOutput, RenderError> {
        let document = parse_stage(&request.source, self.config.max_depth.get())?;

        let mut walker = self.walker(request.public_site_url.as_deref());
        let rendered = walker.render_document(document.as_deref());
        let content_metrics = walker.into_metrics();

        let Some(nodes) = rendered else {
            debug!(
                target = "application::render",
                "Render root is not a document; nothing rendered"
            );
            return Ok(RenderOutput {
                content_metrics,
                ..RenderOutput::empty()
            });
        };

        let html = serialize_stage(nodes, &self.config.container_class);
        let html = if sanitize {
            sanitize_stage(&html, &self.sanitizer)
        } else {
            html
        };

        debug!(
            target = "application::render",
            words = content_metrics.word_count,
            code_blocks = content_metrics.code_blocks_count,
            embeds = content_metrics.embeds_count,
            skipped_nodes = content_metrics.skipped_nodes,
            sanitized = sanitize,
            "Document rendered"
        );

        Ok(RenderOutput {
            html,
            rendered: true,
            contains_code: content_metrics.code_blocks_count > 0,
            contains_embeds: content_metrics.embeds_count > 0,
            content_metrics,
        })
    }
}

impl RenderService for DocumentRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        self.run(request, self.config.sanitize)
    }
}

static RENDER_SERVICE: Lazy<Arc<DocumentRenderService>> =
    Lazy::new(|| Arc::new(DocumentRenderService::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<DocumentRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for DocumentRenderService {
    fn default() -> Self {
        Self::new()
    }
}

/// Stylesheet for the `syntax-` classes emitted by the bundled highlighter.
pub fn highlight_stylesheet() -> &'static str {
    THEME_CSS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPipelineConfig {
    pub max_depth: NonZeroUsize,
    pub container_class: String,
    pub sanitize: bool,
    pub public_site_url: Option<String>,
}

impl Default for RenderPipelineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
            sanitize: true,
            public_site_url: None,
        }
    }
}

impl From<&crate::config::RenderSettings> for RenderPipelineConfig {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            container_class: settings.container_class.clone(),
            sanitize: settings.sanitize,
            public_site_url: settings
                .public_site_url
                .as_deref()
                .map(normalize_public_site_url)
                .filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("render service already configured")]
    AlreadyConfigured,
}

static RENDER_PIPELINE_CONFIG: OnceCell<RenderPipelineConfig> = OnceCell::new();

pub fn configure_render_service(config: RenderPipelineConfig) -> Result<(), RenderConfigError> {
    RENDER_PIPELINE_CONFIG
        .set(config)
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

pub fn active_render_config() -> RenderPipelineConfig {
    RENDER_PIPELINE_CONFIG.get().cloned().unwrap_or_default()
}

fn parse_stage(
    source: &RenderSource,
    max_depth: usize,
) -> Result<Option<Cow<'_, Document>>, RenderError> {
    match source {
        RenderSource::Document(document) => Ok(Some(Cow::Borrowed(document))),
        RenderSource::Value(value) => Ok(Document::from_value(value.clone()).map(Cow::Owned)),
        RenderSource::Json(text) => {
            let value =
                parse_document_json(text, max_depth).map_err(|err| RenderError::Document {
                    message: err.to_string(),
                })?;
            Ok(Document::from_value(value).map(Cow::Owned))
        }
    }
}

fn serialize_stage(nodes: Vec<Markup>, container_class: &str) -> String {
    if container_class.is_empty() {
        return render_html(&nodes);
    }
    Markup::from(
        Element::new("div")
            .attr("class", container_class)
            .children(nodes),
    )
    .to_html()
}

fn sanitize_stage(html: &str, sanitizer: &ammonia::Builder<'static>) -> String {
    sanitizer.clean(html).to_string()
}
