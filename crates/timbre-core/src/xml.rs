//! XML to nested-mapping tree conversion.
//!
//! Documents are turned into a [`serde_json::Value`] with the classic
//! XML-to-dict layout:
//!
//! - the root is a one-key object `{ root_name: body }`
//! - attributes become `@name` entries
//! - text of an element that also has attributes or children lives under `#text`
//! - a text-only element collapses to a string, an empty one to `null`
//! - repeated sibling elements collapse into an array, in document order
//!
//! Element names whose namespace prefix is in the recognized set are
//! addressed by their local name; every other name is kept verbatim.

use std::collections::HashSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::{Map, Value};

use crate::error::InvalidDocument;

/// Prefix marking attribute entries.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key holding the text of mixed elements.
pub const TEXT_KEY: &str = "#text";

/// Namespace prefixes of the CFDI schema family stripped by default.
pub const DEFAULT_NAMESPACE_PREFIXES: &[&str] = &[
    "cfdi", "nomina", "nomina11", "Nomina11", "nomina12", "Nomina12", "pago10", "Pago10",
    "pago20", "Pago20",
];

type Result<T> = std::result::Result<T, InvalidDocument>;

/// An element under construction.
struct Frame {
    name: String,
    body: Map<String, Value>,
    text: String,
}

impl Frame {
    fn into_value(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.body.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut body = self.body;
            if !text.is_empty() {
                body.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
            }
            Value::Object(body)
        };
        (self.name, value)
    }
}

/// Converts XML text into a nested mapping tree.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    namespace_prefixes: HashSet<String>,
}

impl TreeBuilder {
    /// Create a builder stripping the default CFDI prefixes.
    pub fn new() -> Self {
        Self::with_prefixes(DEFAULT_NAMESPACE_PREFIXES.iter().copied())
    }

    /// Create a builder stripping exactly the given prefixes.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Local name for `qualified`, if its prefix is recognized.
    fn element_name<'a>(&self, qualified: &'a str) -> &'a str {
        match qualified.split_once(':') {
            Some((prefix, local)) if self.namespace_prefixes.contains(prefix) => local,
            _ => qualified,
        }
    }

    fn open(&self, start: &BytesStart<'_>) -> Result<Frame> {
        let qname = start.name();
        let name = std::str::from_utf8(qname.as_ref())
            .map_err(|e| InvalidDocument::Malformed(e.to_string()))?;
        let mut body = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| InvalidDocument::Malformed(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| InvalidDocument::Malformed(e.to_string()))?;
            let value = attr
                .unescape_value()
                .map_err(|e| InvalidDocument::Malformed(e.to_string()))?;
            body.insert(
                format!("{ATTRIBUTE_PREFIX}{key}"),
                Value::String(value.into_owned()),
            );
        }
        Ok(Frame {
            name: self.element_name(name).to_string(),
            body,
            text: String::new(),
        })
    }

    /// Parse `text` into a tree rooted at a one-key object.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<Map<String, Value>> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| InvalidDocument::Malformed(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(junk_after_root());
                    }
                    stack.push(self.open(&start)?);
                }
                Event::Empty(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(junk_after_root());
                    }
                    let frame = self.open(&start)?;
                    close(frame, &mut stack, &mut root);
                }
                Event::End(_) => {
                    let frame = stack.pop().ok_or_else(|| {
                        InvalidDocument::Malformed("unmatched closing tag".to_string())
                    })?;
                    close(frame, &mut stack, &mut root);
                }
                Event::Text(content) => {
                    let content = content
                        .unescape()
                        .map_err(|e| InvalidDocument::Malformed(e.to_string()))?;
                    push_text(&mut stack, &content)?;
                }
                Event::CData(content) => {
                    let bytes = content.into_inner();
                    let content = std::str::from_utf8(&bytes)
                        .map_err(|e| InvalidDocument::Malformed(e.to_string()))?;
                    push_text(&mut stack, content)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(InvalidDocument::Malformed(
                "unexpected end of document".to_string(),
            ));
        }
        root.map(Value::Object)
            .ok_or_else(|| InvalidDocument::Malformed("no root element".to_string()))
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn junk_after_root() -> InvalidDocument {
    InvalidDocument::Malformed("junk after document element".to_string())
}

fn push_text(stack: &mut [Frame], content: &str) -> Result<()> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(content);
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err(InvalidDocument::Malformed(
            "text outside the root element".to_string(),
        )),
    }
}

/// Finish `frame` and attach it to its parent, or make it the root.
fn close(frame: Frame, stack: &mut [Frame], root: &mut Option<Map<String, Value>>) {
    let (name, value) = frame.into_value();
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.body, name, value),
        None => {
            let mut map = Map::new();
            map.insert(name, value);
            *root = Some(map);
        }
    }
}

fn insert_child(body: &mut Map<String, Value>, name: String, value: Value) {
    match body.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            body.insert(name, value);
        }
    }
}

/// Parse `text` with the default CFDI prefixes.
pub fn parse_tree(text: &str) -> Result<Value> {
    TreeBuilder::new().parse(text)
}

/// Whether a tree value counts as present: non-null and non-empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
