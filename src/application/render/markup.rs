//! Presentation tree produced by the document renderer.
//!
//! A [`Markup`] value is framework-neutral: elements with ordered attributes and
//! children, escaped text, and pre-rendered fragments (highlighted code, inline
//! icons). [`Markup::to_html`] serialises it for mounting into a page.

use std::fmt::Write as _;

/// Elements serialised without a closing tag.
const VOID_TAGS: [&str; 3] = ["br", "hr", "img"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element(Element),
    /// Literal text; escaped on serialisation.
    Text(String),
    /// Markup that is already escaped and is emitted verbatim.
    Raw(String),
    /// Children mounted without a wrapping container.
    Fragment(Vec<Markup>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Markup>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn attr_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Markup>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag)
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}

impl Markup {
    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    pub fn raw(html: impl Into<String>) -> Self {
        Markup::Raw(html.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Markup::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated literal text of the subtree; raw fragments are skipped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Markup::Text(text) => out.push_str(text),
            Markup::Raw(_) => {}
            Markup::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Markup::Fragment(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Markup::Text(text) => escape_into(text, out),
            Markup::Raw(html) => out.push_str(html),
            Markup::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Markup::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for (name, value) in &element.attrs {
                    let _ = write!(out, " {name}=\"");
                    escape_into(value, out);
                    out.push('"');
                }
                out.push('>');

                if element.is_void() {
                    return;
                }

                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

/// Serialise a sequence of sibling nodes.
pub fn render_html(nodes: &[Markup]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_significant_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn serialises_nested_elements_with_escaped_attributes() {
        let markup: Markup = Element::new("p")
            .attr("style", "text-align: center")
            .child(
                Element::new("a")
                    .attr("href", "https://x.test/?a=1&b=2")
                    .child(Markup::text("1 < 2")),
            )
            .into();

        assert_eq!(
            markup.to_html(),
            r#"<p style="text-align: center"><a href="https://x.test/?a=1&amp;b=2">1 &lt; 2</a></p>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let markup = Markup::Fragment(vec![
            Element::new("br").into(),
            Element::new("img").attr("src", "/a.png").into(),
        ]);
        assert_eq!(markup.to_html(), r#"<br><img src="/a.png">"#);
    }

    #[test]
    fn raw_fragments_are_emitted_verbatim_and_skipped_by_text_content() {
        let markup: Markup = Element::new("code")
            .child(Markup::raw("<span class=\"k\">fn</span>"))
            .child(Markup::text(" main"))
            .into();

        assert_eq!(
            markup.to_html(),
            "<code><span class=\"k\">fn</span> main</code>"
        );
        assert_eq!(markup.text_content(), " main");
    }
}
