//! Locating the `Comprobante` envelope of a parsed document.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::InvalidDocument;
use crate::xml::{is_truthy, TreeBuilder, ATTRIBUTE_PREFIX};

use super::{EnvelopeParser, Result};

/// Local name of the fiscal envelope element.
pub const ENVELOPE_KEY: &str = "Comprobante";

/// The `Comprobante` of a single document.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    fields: Map<String, Value>,
}

impl Envelope {
    /// Interpret a tree value as an envelope.
    ///
    /// Only a non-empty mapping qualifies.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) if !fields.is_empty() => Some(Self { fields }),
            _ => None,
        }
    }

    /// Child element or attribute entry by key.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Attribute value by bare name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&format!("{ATTRIBUTE_PREFIX}{name}"))
            .and_then(Value::as_str)
    }

    /// CFDI schema version, e.g. `3.3` or `4.0`.
    pub fn version(&self) -> Option<&str> {
        self.attribute("Version")
    }

    /// All envelope entries.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Parser for CFDI documents.
#[derive(Debug, Clone, Default)]
pub struct CfdiParser {
    tree: TreeBuilder,
}

impl CfdiParser {
    /// Create a parser recognizing the default CFDI namespace prefixes.
    pub fn new() -> Self {
        Self {
            tree: TreeBuilder::new(),
        }
    }

    /// Recognize exactly the given namespace prefixes.
    pub fn with_namespace_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tree = TreeBuilder::with_prefixes(prefixes);
        self
    }
}

impl EnvelopeParser for CfdiParser {
    fn parse(&self, text: &str) -> Result<Envelope> {
        let tree = self.tree.parse(text)?;
        let Value::Object(mut root) = tree else {
            return Err(InvalidDocument::MissingEnvelope);
        };

        let envelope = root
            .remove(ENVELOPE_KEY)
            .filter(is_truthy)
            .and_then(Envelope::from_value)
            .ok_or(InvalidDocument::MissingEnvelope)?;

        debug!(
            "Found Comprobante version {}",
            envelope.version().unwrap_or("unknown")
        );
        Ok(envelope)
    }
}
