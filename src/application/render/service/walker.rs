//! Recursive descent from document nodes to presentation markup.
//!
//! The walker is the only stateful piece of a render call, and its state is
//! limited to counters feeding [`ContentMetrics`]. Output depends only on the
//! input tree and the highlighter.

use metrics::counter;
use tracing::{debug, warn};
use url::Url;

use crate::{
    application::render::{
        markup::{Element, Markup},
        types::ContentMetrics,
    },
    domain::{
        document::{Document, Node},
        embeds::extract_youtube_id,
        nodes::{MarkKind, NodeKind},
    },
    infra::telemetry::{HIGHLIGHT_FALLBACK_METRIC, SKIPPED_NODES_METRIC},
};

use super::{embeds, highlight::Highlighter};

const WORDS_PER_MINUTE: f32 = 225.0;
const LINK_CLASS: &str = "text-blue-600 dark:text-blue-400 underline hover:text-blue-800 dark:hover:text-blue-300 transition-colors";

pub(crate) struct DocumentWalker<'a> {
    highlighter: &'a dyn Highlighter,
    max_depth: usize,
    site_origin: Option<Url>,
    stats: WalkStats,
}

#[derive(Debug, Default)]
struct WalkStats {
    words: u32,
    internal_links: u32,
    external_links: u32,
    images: u32,
    images_missing_alt: u32,
    code_blocks: u32,
    highlighted_code_blocks: u32,
    embeds: u32,
    skipped_nodes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Internal,
    External,
    Anchor,
    Other,
}

impl<'a> DocumentWalker<'a> {
    pub(crate) fn new(highlighter: &'a dyn Highlighter, max_depth: usize) -> Self {
        Self {
            highlighter,
            max_depth,
            site_origin: None,
            stats: WalkStats::default(),
        }
    }

    /// Links pointing at this origin count as internal.
    pub(crate) fn with_public_site_url(mut self, public_site_url: Option<&str>) -> Self {
        self.site_origin = public_site_url.and_then(|url| Url::parse(url).ok());
        self
    }

    /// Render every top-level node of a `doc` root. Any other root yields `None`.
    pub(crate) fn render_document(&mut self, document: Option<&Document>) -> Option<Vec<Markup>> {
        let document = document.filter(|document| document.is_document())?;
        Some(
            document
                .children()
                .filter_map(|child| self.visit(child, 1))
                .collect(),
        )
    }

    pub(crate) fn render_node(&mut self, node: Option<&Node>) -> Option<Markup> {
        self.visit(node, 1)
    }

    pub(crate) fn into_metrics(self) -> ContentMetrics {
        self.stats.into_metrics()
    }

    fn visit(&mut self, node: Option<&Node>, depth: usize) -> Option<Markup> {
        let Some(node) = node else {
            return self.skip("null", "null_node");
        };

        if depth > self.max_depth {
            warn!(
                target = "application::render::walker",
                node_type = %node.kind,
                depth,
                max_depth = self.max_depth,
                "Node nested beyond render depth limit skipped"
            );
            return self.skip(&node.kind, "depth_limit");
        }

        let markup = match NodeKind::classify(node) {
            NodeKind::Paragraph { align } => {
                aligned(Element::new("p"), align, self.render_children(node, depth))
            }
            NodeKind::Heading { level, align } => {
                aligned(Element::new(level.tag()), align, self.render_children(node, depth))
            }
            NodeKind::BulletList => container("ul", self.render_children(node, depth)),
            NodeKind::OrderedList => container("ol", self.render_children(node, depth)),
            NodeKind::ListItem => container("li", self.render_children(node, depth)),
            NodeKind::Blockquote => container("blockquote", self.render_children(node, depth)),
            NodeKind::CodeBlock { language } => self.render_code_block(node, language, depth),
            NodeKind::Text { text, marks } => {
                self.stats.words = self
                    .stats
                    .words
                    .saturating_add(text.split_whitespace().count() as u32);
                marks
                    .iter()
                    .map(MarkKind::classify)
                    .fold(Markup::text(text), |inner, mark| self.wrap_mark(inner, mark))
            }
            NodeKind::Image(attrs) => {
                let Some(src) = attrs.src else {
                    return self.skip(&node.kind, "missing_src");
                };
                self.stats.images += 1;
                if attrs.alt.is_empty() {
                    self.stats.images_missing_alt += 1;
                }
                embeds::image(src, attrs.alt, attrs.title)
            }
            NodeKind::Youtube { src } => {
                let Some(src) = src else {
                    return self.skip(&node.kind, "missing_src");
                };
                let Some(video_id) = extract_youtube_id(src) else {
                    return self.skip(&node.kind, "unrecognised_video_url");
                };
                self.stats.embeds += 1;
                embeds::youtube(video_id)
            }
            NodeKind::PaintTag(attrs) => embeds::paint_tag(&attrs),
            NodeKind::CloudStorageLink(attrs) => {
                self.record_link(&attrs.url);
                embeds::cloud_storage_link(&attrs)
            }
            NodeKind::HorizontalRule => Element::new("hr").attr("class", "my-8").into(),
            NodeKind::HardBreak => Element::new("br").into(),
            NodeKind::Unknown(kind) => {
                if !node.has_content() {
                    return None;
                }
                debug!(
                    target = "application::render::walker",
                    node_type = kind,
                    "Unknown node type rendered as passthrough"
                );
                Markup::Fragment(self.render_children(node, depth))
            }
        };

        Some(markup)
    }

    fn render_children(&mut self, node: &Node, depth: usize) -> Vec<Markup> {
        node.children()
            .filter_map(|child| self.visit(child, depth + 1))
            .collect()
    }

    fn wrap_mark(&mut self, inner: Markup, mark: MarkKind<'_>) -> Markup {
        let wrapper = match mark {
            MarkKind::Bold => Element::new("strong"),
            MarkKind::Italic => Element::new("em"),
            MarkKind::Strike => Element::new("s"),
            MarkKind::Code => Element::new("code"),
            MarkKind::Underline => Element::new("u"),
            MarkKind::Subscript => Element::new("sub"),
            MarkKind::Superscript => Element::new("sup"),
            MarkKind::Highlight { color } => Element::new("mark")
                .attr("style", format!("background-color: {color}"))
                .attr("class", "rounded px-0.5"),
            MarkKind::TextStyle { color: Some(color) } => {
                Element::new("span").attr("style", format!("color: {color}"))
            }
            MarkKind::Link { href: Some(href) } => {
                self.record_link(href);
                Element::new("a")
                    .attr("href", href)
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .attr("class", LINK_CLASS)
            }
            MarkKind::TextStyle { color: None } | MarkKind::Link { href: None } => return inner,
            MarkKind::Unknown(kind) => {
                debug!(
                    target = "application::render::walker",
                    mark_type = kind,
                    "Unknown mark type ignored"
                );
                return inner;
            }
        };

        wrapper.child(inner).into()
    }

    fn render_code_block(&mut self, node: &Node, language: Option<&str>, depth: usize) -> Markup {
        self.stats.code_blocks += 1;
        let code = collect_code_text(node, self.max_depth.saturating_sub(depth));

        let body = match language {
            Some(language) => match self.highlighter.highlight(language, &code) {
                Ok(html) => {
                    self.stats.highlighted_code_blocks += 1;
                    Markup::raw(html)
                }
                Err(err) => {
                    debug!(
                        target = "application::render::highlight",
                        language,
                        error = %err,
                        "Code block rendered without highlighting"
                    );
                    counter!(HIGHLIGHT_FALLBACK_METRIC).increment(1);
                    Markup::text(code)
                }
            },
            None => Markup::text(code),
        };

        let code_class = match language {
            Some(language) => format!("language-{language} hljs"),
            None => "hljs".to_string(),
        };

        Element::new("pre")
            .attr("class", "hljs")
            .child(Element::new("code").attr("class", code_class).child(body))
            .into()
    }

    fn skip(&mut self, node_type: &str, reason: &'static str) -> Option<Markup> {
        self.stats.skipped_nodes += 1;
        debug!(
            target = "application::render::walker",
            node_type,
            reason,
            "Node skipped"
        );
        counter!(SKIPPED_NODES_METRIC, "reason" => reason).increment(1);
        None
    }

    fn record_link(&mut self, href: &str) {
        match self.classify_link(href) {
            LinkKind::Internal => self.stats.internal_links += 1,
            LinkKind::External => self.stats.external_links += 1,
            LinkKind::Anchor | LinkKind::Other => {}
        }
    }

    fn classify_link(&self, href: &str) -> LinkKind {
        if href.is_empty() || href.starts_with('#') {
            return LinkKind::Anchor;
        }

        if href.starts_with("http://") || href.starts_with("https://") {
            let same_origin = self.site_origin.as_ref().is_some_and(|site| {
                Url::parse(href)
                    .map(|target| target.origin() == site.origin())
                    .unwrap_or(false)
            });
            return if same_origin {
                LinkKind::Internal
            } else {
                LinkKind::External
            };
        }

        if href.starts_with('/')
            || href.starts_with("./")
            || href.starts_with("../")
            || (!href.contains(':') && !href.starts_with("//"))
        {
            return LinkKind::Internal;
        }

        LinkKind::Other
    }
}

impl WalkStats {
    fn into_metrics(self) -> ContentMetrics {
        let reading_time_minutes = if self.words == 0 {
            0
        } else {
            ((self.words as f32 / WORDS_PER_MINUTE).ceil() as u32).max(1)
        };

        ContentMetrics {
            word_count: self.words,
            reading_time_minutes,
            internal_links_count: self.internal_links,
            external_links_count: self.external_links,
            images_count: self.images,
            images_missing_alt: self.images_missing_alt,
            code_blocks_count: self.code_blocks,
            highlighted_code_blocks: self.highlighted_code_blocks,
            embeds_count: self.embeds,
            skipped_nodes: self.skipped_nodes,
        }
    }
}

/// Depth-first concatenation of every descendant `text` payload, marks ignored.
///
/// Descent stops once `remaining` levels are used up.
pub(crate) fn collect_code_text(node: &Node, remaining: usize) -> String {
    let mut out = String::new();
    push_code_text(node, remaining, &mut out);
    out
}

fn push_code_text(node: &Node, remaining: usize, out: &mut String) {
    if remaining == 0 {
        return;
    }
    for child in node.children().flatten() {
        if child.kind == "text" {
            out.push_str(child.text.as_deref().unwrap_or_default());
        } else {
            push_code_text(child, remaining - 1, out);
        }
    }
}

fn container(tag: &'static str, children: Vec<Markup>) -> Markup {
    Element::new(tag).children(children).into()
}

fn aligned(element: Element, align: Option<&str>, children: Vec<Markup>) -> Markup {
    element
        .attr_opt("style", align.map(|align| format!("text-align: {align}")))
        .children(children)
        .into()
}
