use std::{borrow::Cow, collections::HashSet};

use ammonia::Builder as AmmoniaBuilder;

/// Allow-list matching the markup the document walker emits, plus inline
/// provider icons and the embedded player frame.
pub(crate) fn build_document_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "b",
        "blockquote",
        "br",
        "code",
        "div",
        "em",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "iframe",
        "img",
        "li",
        "mark",
        "ol",
        "p",
        "pre",
        "s",
        "span",
        "strong",
        "sub",
        "sup",
        "u",
        "ul",
        "svg",
        "path",
        "circle",
        "polyline",
        "line",
    ]);
    builder.tags(tags);

    let generic: HashSet<&'static str> =
        HashSet::from(["class", "style", "title", "aria-hidden", "aria-label"]);
    builder.generic_attributes(generic);

    builder.add_tag_attributes("a", &["target"]);
    builder.add_tag_attributes(
        "img",
        &["alt", "width", "height", "loading", "decoding"],
    );
    builder.add_tag_attributes("iframe", &["src", "allow", "allowfullscreen"]);
    builder.add_tag_attributes(
        "svg",
        &[
            "viewBox",
            "xmlns",
            "width",
            "height",
            "fill",
            "stroke",
            "stroke-width",
            "stroke-linecap",
            "stroke-linejoin",
        ],
    );
    builder.add_tag_attributes("path", &["d", "fill", "stroke", "stroke-width"]);
    builder.add_tag_attributes("circle", &["cx", "cy", "r", "fill"]);
    builder.add_tag_attributes("polyline", &["points"]);
    builder.add_tag_attributes("line", &["x1", "x2", "y1", "y2"]);

    builder.add_url_schemes(["http", "https", "mailto", "tel"].iter().copied());

    builder.attribute_filter(|_element, attribute, value| {
        if attribute.eq_ignore_ascii_case("style") {
            sanitize_style_attribute(value).map(Cow::Owned)
        } else {
            Some(Cow::Borrowed(value))
        }
    });

    builder
}

fn sanitize_style_attribute(value: &str) -> Option<String> {
    let kept: Vec<&str> = value
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty() && is_safe_style_declaration(decl))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("; "))
    }
}

fn is_safe_style_declaration(decl: &str) -> bool {
    const FORBIDDEN_SUBSTRINGS: [&str; 7] = [
        "expression(",
        "javascript:",
        "vbscript:",
        "-moz-binding",
        "behavior:",
        "behaviour:",
        "@import",
    ];

    let lower = decl.to_ascii_lowercase();
    !FORBIDDEN_SUBSTRINGS
        .iter()
        .any(|needle| lower.contains(needle))
        && !contains_unsafe_url(&lower)
}

fn contains_unsafe_url(lower_decl: &str) -> bool {
    let mut rest = lower_decl;

    while let Some(start) = rest.find("url(") {
        let after_open = &rest[start + 4..];
        let Some(close) = after_open.find(')') else {
            // unterminated url(
            return true;
        };

        let target = after_open[..close]
            .trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"');
        if is_unsafe_url(target) {
            return true;
        }

        rest = &after_open[close + 1..];
    }

    false
}

fn is_unsafe_url(url: &str) -> bool {
    if url.starts_with("data:image/") {
        return false;
    }

    url.starts_with("data:")
        || url.starts_with("file:")
        || url.contains("javascript:")
        || url.contains("vbscript:")
}
