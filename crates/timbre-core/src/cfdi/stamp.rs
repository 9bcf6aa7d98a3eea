//! Digital stamp (`TimbreFiscalDigital`) extraction.

use serde_json::{Map, Value};

use crate::error::InvalidDocument;
use crate::xml::{is_truthy, ATTRIBUTE_PREFIX};

use super::{Envelope, Result};

/// Key of the complement container inside the envelope.
pub const COMPLEMENT_KEY: &str = "Complemento";

/// Key of the stamp record inside a complement.
pub const STAMP_KEY: &str = "tfd:TimbreFiscalDigital";

/// Stamp key once its `tfd` prefix has been stripped.
const STAMP_LOCAL_KEY: &str = "TimbreFiscalDigital";

/// The `Complemento` of an envelope.
///
/// XML collapses a single repetition into a bare element, so the container
/// is either one mapping or an ordered list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Complement {
    Single(Map<String, Value>),
    Many(Vec<Map<String, Value>>),
}

impl Complement {
    /// Resolve the container shape of a tree value.
    ///
    /// Returns `None` for an absent or empty container. List entries that are
    /// not mappings carry no complements and are dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_truthy(value) {
            return None;
        }
        let complement = match value {
            Value::Object(map) => Self::Single(map.clone()),
            Value::Array(items) => Self::Many(
                items
                    .iter()
                    .filter_map(|item| item.as_object().cloned())
                    .collect(),
            ),
            _ => Self::Single(Map::new()),
        };
        Some(complement)
    }

    /// Complement entries as a uniform sequence.
    pub fn iter(&self) -> std::slice::Iter<'_, Map<String, Value>> {
        match self {
            Self::Single(map) => std::slice::from_ref(map).iter(),
            Self::Many(maps) => maps.iter(),
        }
    }

    /// First stamp record across all entries.
    pub fn stamp(&self) -> Option<StampRecord> {
        self.iter().find_map(|entry| {
            entry
                .get(STAMP_KEY)
                .filter(|value| is_truthy(value))
                .or_else(|| entry.get(STAMP_LOCAL_KEY).filter(|value| is_truthy(value)))
                .map(StampRecord::from_value)
        })
    }
}

/// The digital stamp of a certified document.
#[derive(Debug, Clone, PartialEq)]
pub struct StampRecord {
    attributes: Map<String, Value>,
}

impl StampRecord {
    fn from_value(value: &Value) -> Self {
        let attributes = match value {
            Value::Object(map) => map.clone(),
            // Repeated stamp elements: the first mapping wins.
            Value::Array(items) => items
                .iter()
                .find_map(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            _ => Map::new(),
        };
        Self { attributes }
    }

    /// Attribute value by bare name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&format!("{ATTRIBUTE_PREFIX}{name}"))
            .and_then(Value::as_str)
    }

    /// The fiscal UUID assigned by the stamp.
    pub fn uuid(&self) -> Result<&str> {
        self.attribute("UUID")
            .filter(|uuid| !uuid.is_empty())
            .ok_or(InvalidDocument::MissingUuid)
    }

    /// Certification timestamp, if present.
    pub fn stamped_at(&self) -> Option<&str> {
        self.attribute("FechaTimbrado")
    }
}

/// Locate the digital stamp of an envelope.
pub fn extract_stamp(envelope: &Envelope) -> Result<StampRecord> {
    let complement = envelope
        .field(COMPLEMENT_KEY)
        .and_then(Complement::from_value)
        .ok_or(InvalidDocument::MissingComplement)?;

    complement.stamp().ok_or(InvalidDocument::MissingStamp)
}
