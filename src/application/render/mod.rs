//! Document rendering pipeline.
//!
//! Rendering is pure: a document tree goes in, deterministic markup and
//! content metrics come out. Callers decide what to do with the HTML.

pub mod markup;
mod service;
mod types;

pub use markup::{Element, Markup, escape_html, render_html};
pub use service::{
    DEFAULT_CONTAINER_CLASS, DEFAULT_MAX_DEPTH, DocumentRenderService, HighlightError,
    Highlighter, PlainTextHighlighter, RenderConfigError, RenderPipelineConfig,
    SyntectHighlighter, active_render_config, configure_render_service, highlight_stylesheet,
    render_service,
};
pub use types::{
    ContentMetrics, RenderError, RenderOutput, RenderRequest, RenderService, RenderSource,
};
