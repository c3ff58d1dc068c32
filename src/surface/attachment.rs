//! Objects inserted into the editor on commit
//!
//! The object is an ordered merge of three sources, later ones overriding
//! earlier ones:
//!
//! 1. the option's content (`content`)
//! 2. the JSON payload declared on the option (`data-mention-attachment`)
//! 3. per-field data attributes (`data-mention-attachment-content-type` →
//!    `contentType`)
//!
//! An unparsable payload counts as empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::element::OptionItem;

/// Default name of the JSON payload attribute
pub const DEFAULT_ATTACHMENT_ATTRIBUTE: &str = "data-mention-attachment";

/// Object inserted into the editor in place of a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachment(Map<String, Value>);

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of a field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Overlay every field of `source` onto this object
    pub fn merge(&mut self, source: Map<String, Value>) {
        self.0.extend(source);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Attachment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Which option attributes feed the inserted object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSpec {
    json_attribute: String,
    field_prefix: String,
}

impl Default for AttachmentSpec {
    fn default() -> Self {
        Self::new(DEFAULT_ATTACHMENT_ATTRIBUTE)
    }
}

impl AttachmentSpec {
    /// # Arguments
    /// * `json_attribute` - Attribute holding the JSON payload; per-field
    ///   attributes share it as a `-` separated prefix
    pub fn new(json_attribute: impl Into<String>) -> Self {
        let json_attribute = json_attribute.into();
        let field_prefix = format!("{json_attribute}-");
        Self {
            json_attribute,
            field_prefix,
        }
    }

    /// Build the object inserted for a committed option
    pub fn build(&self, item: &OptionItem) -> Attachment {
        let mut object = Attachment::new();
        object.insert("content", item.content.clone());
        object.merge(self.payload(item));
        object.merge(self.field_overrides(item));
        object
    }

    fn payload(&self, item: &OptionItem) -> Map<String, Value> {
        let Some(raw) = item.attribute(&self.json_attribute) else {
            return Map::new();
        };

        match serde_json::from_str::<Map<String, Value>>(raw) {
            Ok(map) => map,
            Err(e) => {
                debug!(attribute = %self.json_attribute, error = %e, "ignoring malformed attachment payload");
                Map::new()
            }
        }
    }

    fn field_overrides(&self, item: &OptionItem) -> Map<String, Value> {
        item.attributes
            .iter()
            .filter_map(|(name, value)| {
                let field = name.strip_prefix(&self.field_prefix)?;
                if field.is_empty() {
                    return None;
                }
                Some((camel_case(field), Value::String(value.clone())))
            })
            .collect()
    }
}

/// `content-type` → `contentType`
fn camel_case(kebab: &str) -> String {
    let mut out = String::with_capacity(kebab.len());
    let mut upper_next = false;

    for c in kebab.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}
