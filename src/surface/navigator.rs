//! Keyboard navigation over a surface's options

use super::editor::Editor;
use super::element::{OptionItem, SurfaceRef};

/// A key press forwarded from the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn escape() -> Self {
        Self::new("Escape")
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }
}

/// What a navigator did with a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// The key is not a navigation key
    Ignored,
    /// The selection moved
    Moved,
    /// The user chose an option
    Commit(OptionItem),
}

/// Turns a surface into a keyboard-navigable option list
pub trait ListNavigator: Send {
    fn start(&mut self);

    fn destroy(&mut self);

    /// Move the selection by `delta` options
    fn navigate(&mut self, delta: isize);

    fn handle_key(&mut self, key: &KeyPress) -> NavAction;
}

/// Creates a navigator bound to an input element and a surface
pub trait NavigatorFactory: Send + Sync {
    fn create(&self, input: &dyn Editor, surface: SurfaceRef) -> Box<dyn ListNavigator>;
}
