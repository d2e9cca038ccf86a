//! Closed views over the loosely-typed document tree.
//!
//! [`NodeKind::classify`] and [`MarkKind::classify`] narrow a boundary node or
//! mark into one variant per known `type`, resolving attribute defaults on the
//! way. The loose `attrs` map never travels past these constructors.

use std::borrow::Cow;

use serde_json::Value;

use super::document::{Mark, Node};
use super::embeds::{CLOUD_STORAGE_LABEL, CloudStorageProvider, FILE_LABEL};

/// Background colour of a `highlight` mark without an explicit colour.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffff00";

/// Heading rank resolved from `attrs.level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Absent or `null` levels default to `H1`; any value that is not an integral
    /// number in `1..=6` falls through to `H6`.
    pub fn from_attr(value: Option<&Value>) -> Self {
        let number = match value {
            None | Some(Value::Null) => return Self::H1,
            Some(Value::Number(number)) => number,
            Some(_) => return Self::H6,
        };

        let level = number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0)
                .map(|value| value as i64)
        });

        match level {
            Some(1) => Self::H1,
            Some(2) => Self::H2,
            Some(3) => Self::H3,
            Some(4) => Self::H4,
            Some(5) => Self::H5,
            _ => Self::H6,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttrs<'a> {
    pub src: Option<&'a str>,
    pub alt: &'a str,
    pub title: &'a str,
}

/// Inline paint badge. Attributes are a caller contract and are not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintTagAttrs<'a> {
    pub brand: Cow<'a, str>,
    pub code: Cow<'a, str>,
    pub color: Cow<'a, str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudLinkAttrs<'a> {
    pub url: Cow<'a, str>,
    pub provider: Option<CloudStorageProvider>,
    pub title: Option<&'a str>,
}

impl CloudLinkAttrs<'_> {
    /// Explicit title, else the provider label, else the generic file label.
    pub fn display_title(&self) -> &str {
        self.title
            .or_else(|| self.provider.map(CloudStorageProvider::label))
            .unwrap_or(FILE_LABEL)
    }

    pub fn provider_label(&self) -> &'static str {
        self.provider
            .map(CloudStorageProvider::label)
            .unwrap_or(CLOUD_STORAGE_LABEL)
    }
}

/// Node variants the renderer dispatches on.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    Paragraph { align: Option<&'a str> },
    Heading { level: HeadingLevel, align: Option<&'a str> },
    BulletList,
    OrderedList,
    ListItem,
    Blockquote,
    CodeBlock { language: Option<&'a str> },
    Text { text: &'a str, marks: &'a [Mark] },
    Image(ImageAttrs<'a>),
    Youtube { src: Option<&'a str> },
    PaintTag(PaintTagAttrs<'a>),
    CloudStorageLink(CloudLinkAttrs<'a>),
    HorizontalRule,
    HardBreak,
    /// Any unrecognised `type`; rendered as a transparent container.
    Unknown(&'a str),
}

impl<'a> NodeKind<'a> {
    pub fn classify(node: &'a Node) -> Self {
        match node.kind.as_str() {
            "paragraph" => Self::Paragraph {
                align: text_align(node),
            },
            "heading" => Self::Heading {
                level: HeadingLevel::from_attr(node.attr("level")),
                align: text_align(node),
            },
            "bulletList" => Self::BulletList,
            "orderedList" => Self::OrderedList,
            "listItem" => Self::ListItem,
            "blockquote" => Self::Blockquote,
            "codeBlock" => Self::CodeBlock {
                language: set_str(node.attr("language")),
            },
            "text" => Self::Text {
                text: node.text.as_deref().unwrap_or_default(),
                marks: node.marks(),
            },
            "image" => Self::Image(ImageAttrs {
                src: set_str(node.attr("src")),
                alt: set_str(node.attr("alt")).unwrap_or_default(),
                title: set_str(node.attr("title")).unwrap_or_default(),
            }),
            "youtube" => Self::Youtube {
                src: set_str(node.attr("src")),
            },
            "paintTag" => Self::PaintTag(PaintTagAttrs {
                brand: display_value(node.attr("brand")),
                code: display_value(node.attr("code")),
                color: display_value(node.attr("color")),
            }),
            "cloudStorageLink" => Self::CloudStorageLink(CloudLinkAttrs {
                url: display_value(node.attr("url")),
                provider: set_str(node.attr("provider")).and_then(CloudStorageProvider::parse),
                title: set_str(node.attr("title")),
            }),
            "horizontalRule" => Self::HorizontalRule,
            "hardBreak" => Self::HardBreak,
            other => Self::Unknown(other),
        }
    }
}

/// Mark variants applied to text runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkKind<'a> {
    Bold,
    Italic,
    Strike,
    Code,
    Underline,
    Subscript,
    Superscript,
    Highlight { color: &'a str },
    TextStyle { color: Option<&'a str> },
    Link { href: Option<&'a str> },
    Unknown(&'a str),
}

impl<'a> MarkKind<'a> {
    pub fn classify(mark: &'a Mark) -> Self {
        match mark.kind.as_str() {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "strike" => Self::Strike,
            "code" => Self::Code,
            "underline" => Self::Underline,
            "subscript" => Self::Subscript,
            "superscript" => Self::Superscript,
            "highlight" => Self::Highlight {
                color: set_str(mark.attr("color")).unwrap_or(DEFAULT_HIGHLIGHT_COLOR),
            },
            "textStyle" => Self::TextStyle {
                color: set_str(mark.attr("color")),
            },
            "link" => Self::Link {
                href: set_str(mark.attr("href")),
            },
            other => Self::Unknown(other),
        }
    }
}

/// Alignment override; `left` and unset are both the natural alignment.
fn text_align(node: &Node) -> Option<&str> {
    set_str(node.attr("textAlign")).filter(|align| *align != "left")
}

/// A string attribute counts as set only when it is non-empty.
fn set_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn display_value(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
        Some(Value::Number(number)) => Cow::Owned(number.to_string()),
        Some(Value::Bool(flag)) => Cow::Owned(flag.to_string()),
        _ => Cow::Borrowed(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn heading_levels_resolve_with_defaults() {
        let cases = [
            (None, HeadingLevel::H1),
            (Some(json!(null)), HeadingLevel::H1),
            (Some(json!(1)), HeadingLevel::H1),
            (Some(json!(2)), HeadingLevel::H2),
            (Some(json!(3)), HeadingLevel::H3),
            (Some(json!(4)), HeadingLevel::H4),
            (Some(json!(5)), HeadingLevel::H5),
            (Some(json!(6)), HeadingLevel::H6),
            (Some(json!(3.0)), HeadingLevel::H3),
            (Some(json!(0)), HeadingLevel::H6),
            (Some(json!(-2)), HeadingLevel::H6),
            (Some(json!(7)), HeadingLevel::H6),
            (Some(json!(2.5)), HeadingLevel::H6),
            (Some(json!("2")), HeadingLevel::H6),
        ];

        for (value, expected) in cases {
            assert_eq!(
                HeadingLevel::from_attr(value.as_ref()),
                expected,
                "{value:?}"
            );
        }
    }

    #[test]
    fn paragraph_alignment_ignores_left_and_empty() {
        let left = Node::new("paragraph").with_attr("textAlign", "left");
        let empty = Node::new("paragraph").with_attr("textAlign", "");
        let center = Node::new("paragraph").with_attr("textAlign", "center");

        assert_eq!(NodeKind::classify(&left), NodeKind::Paragraph { align: None });
        assert_eq!(NodeKind::classify(&empty), NodeKind::Paragraph { align: None });
        assert_eq!(
            NodeKind::classify(&center),
            NodeKind::Paragraph {
                align: Some("center")
            }
        );
    }

    #[test]
    fn image_attrs_default_to_empty_strings() {
        let node = Node::new("image").with_attr("src", "/a.png");
        assert_eq!(
            NodeKind::classify(&node),
            NodeKind::Image(ImageAttrs {
                src: Some("/a.png"),
                alt: "",
                title: "",
            })
        );

        let missing = Node::new("image").with_attr("alt", "nothing to show");
        match NodeKind::classify(&missing) {
            NodeKind::Image(attrs) => assert_eq!(attrs.src, None),
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn paint_tag_renders_numbers_and_tolerates_missing_attrs() {
        let node = Node::new("paintTag")
            .with_attr("brand", "Vallejo")
            .with_attr("code", 70950);
        match NodeKind::classify(&node) {
            NodeKind::PaintTag(attrs) => {
                assert_eq!(attrs.brand, "Vallejo");
                assert_eq!(attrs.code, "70950");
                assert_eq!(attrs.color, "");
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn cloud_link_titles_fall_back_through_provider_labels() {
        let titled = Node::new("cloudStorageLink")
            .with_attr("url", "https://drive.example/f")
            .with_attr("provider", "dropbox")
            .with_attr("title", "Specs.pdf");
        let by_provider = Node::new("cloudStorageLink")
            .with_attr("url", "https://drive.example/f")
            .with_attr("provider", "dropbox");
        let unrecognised = Node::new("cloudStorageLink")
            .with_attr("url", "https://drive.example/f")
            .with_attr("provider", "ftp");

        let titles: Vec<(String, &str)> = [&titled, &by_provider, &unrecognised]
            .into_iter()
            .map(|node| match NodeKind::classify(node) {
                NodeKind::CloudStorageLink(attrs) => {
                    (attrs.display_title().to_string(), attrs.provider_label())
                }
                other => panic!("unexpected variant {other:?}"),
            })
            .collect();

        assert_eq!(
            titles,
            vec![
                ("Specs.pdf".to_string(), "Dropbox"),
                ("Dropbox".to_string(), "Dropbox"),
                ("File".to_string(), "Cloud storage"),
            ]
        );
    }

    #[test]
    fn unknown_types_keep_their_tag() {
        let node = Node::new("customFutureBlock");
        assert_eq!(
            NodeKind::classify(&node),
            NodeKind::Unknown("customFutureBlock")
        );
    }

    #[test]
    fn marks_resolve_colour_defaults() {
        let highlight = Mark::new("highlight");
        let coloured = Mark::new("highlight").with_attr("color", "#00ff00");
        let plain_style = Mark::new("textStyle");
        let link = Mark::new("link");

        assert_eq!(
            MarkKind::classify(&highlight),
            MarkKind::Highlight { color: "#ffff00" }
        );
        assert_eq!(
            MarkKind::classify(&coloured),
            MarkKind::Highlight { color: "#00ff00" }
        );
        assert_eq!(
            MarkKind::classify(&plain_style),
            MarkKind::TextStyle { color: None }
        );
        assert_eq!(MarkKind::classify(&link), MarkKind::Link { href: None });
        assert_eq!(
            MarkKind::classify(&Mark::new("spoiler")),
            MarkKind::Unknown("spoiler")
        );
    }
}
