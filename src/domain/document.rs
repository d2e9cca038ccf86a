//! JSON boundary types for rich-text documents.
//!
//! These mirror the editor's wire format as-is: every node is tagged by a free
//! form `type` string and carries a loosely-typed `attrs` object. Nothing here
//! interprets the tags; [`super::nodes`] narrows them into closed variants at
//! dispatch time.
//!
//! Deserialisation is lenient below the root: a child that is not a node
//! becomes an empty slot, and a mark that is not a mark is dropped, so one
//! malformed entry never takes its siblings down with it.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::warn;

/// Type tag a root value must carry to be rendered.
pub const DOCUMENT_TYPE: &str = "doc";

/// Loosely-typed attribute bag attached to nodes and marks.
pub type Attrs = Map<String, Value>;

/// Root of a rich-text document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient_children",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Vec<Option<Node>>>,
}

impl Document {
    /// Build a `doc` root from the supplied children.
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            kind: DOCUMENT_TYPE.to_string(),
            content: Some(content.into_iter().map(Some).collect()),
        }
    }

    /// Whether the root carries the `doc` tag and may be rendered.
    pub fn is_document(&self) -> bool {
        self.kind == DOCUMENT_TYPE
    }

    /// Interpret an arbitrary JSON value as a document root.
    ///
    /// Values that are not objects with a string `type` yield `None`; such roots
    /// render to nothing rather than failing.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value
            .get("type")
            .map(Value::is_string)
            .unwrap_or(false)
        {
            return None;
        }
        match serde_json::from_value(value) {
            Ok(document) => Some(document),
            Err(err) => {
                warn!(
                    target = "domain::document",
                    error = %err,
                    "Document root could not be read; nothing rendered"
                );
                None
            }
        }
    }

    pub fn children(&self) -> impl Iterator<Item = Option<&Node>> {
        self.content
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Option::as_ref)
    }
}

/// One element of the document tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Empty when the payload omits the tag or carries a non-string one.
    #[serde(rename = "type", default, deserialize_with = "lenient_tag")]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub attrs: Option<Attrs>,
    #[serde(
        default,
        deserialize_with = "lenient_children",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Vec<Option<Node>>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_marks",
        skip_serializing_if = "Option::is_none"
    )]
    pub marks: Option<Vec<Mark>>,
}

impl Node {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Convenience constructor for a `text` leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_content(mut self, children: Vec<Node>) -> Self {
        self.content = Some(children.into_iter().map(Some).collect());
        self
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = Some(marks);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }

    /// Children in order; `None` entries stand for `null` slots in the payload.
    pub fn children(&self) -> impl Iterator<Item = Option<&Node>> {
        self.content
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Option::as_ref)
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn marks(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or_default()
    }
}

/// Inline formatting annotation attached to a text run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type", default, deserialize_with = "lenient_tag")]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub attrs: Option<Attrs>,
}

impl Mark {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }
}

fn lenient_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(tag) => tag,
        _ => String::new(),
    })
}

/// Keep a field only when it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| read_entry(value, "field")))
}

fn lenient_children<'de, D>(deserializer: D) -> Result<Option<Vec<Option<Node>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .map(|entry| match entry {
                Value::Null => None,
                entry => read_entry(entry, "node"),
            })
            .collect(),
    ))
}

fn lenient_marks<'de, D>(deserializer: D) -> Result<Option<Vec<Mark>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter(|entry| !entry.is_null())
            .filter_map(|entry| read_entry(entry, "mark"))
            .collect(),
    ))
}

fn read_entry<T: DeserializeOwned>(value: Value, entry: &'static str) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(
                target = "domain::document",
                entry,
                error = %err,
                "Malformed document entry dropped"
            );
            None
        }
    }
}
