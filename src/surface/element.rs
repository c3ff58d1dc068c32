//! Suggestion surfaces and their options

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An option element inside a surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionItem {
    pub id: Option<String>,
    /// Rendered content of the option
    pub content: String,
    /// Element attributes, e.g. `data-mention-attachment-sgid`
    pub attributes: BTreeMap<String, String>,
}

impl OptionItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Element hosting suggestion options.
///
/// Surfaces are shared between the document and the session, so every
/// method takes `&self`; implementations use interior mutability.
pub trait Surface: Send + Sync + fmt::Debug {
    fn id(&self) -> Option<String>;

    fn set_id(&self, id: String);

    /// Whether the element is part of the document
    fn is_connected(&self) -> bool;

    /// Called by a host after appending the element
    fn attach(&self);

    /// Detach the element from the document
    fn remove(&self);

    fn set_hidden(&self, hidden: bool);

    /// Position the element at pixel coordinates
    fn place(&self, top: f64, left: f64);

    fn options(&self) -> Vec<OptionItem>;

    fn child_count(&self) -> usize {
        self.options().len()
    }
}

pub type SurfaceRef = Arc<dyn Surface>;
