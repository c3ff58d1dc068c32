//! Editor and host contracts

use std::ops::Range;

use super::attachment::Attachment;
use super::element::SurfaceRef;
use crate::error::{Result, UsageError};

/// Pixel rectangle of a glyph
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Rich-text editing surface.
///
/// Offsets are counted in chars of [`Editor::current_text`].
pub trait Editor: Send {
    /// Element name, reported in usage errors
    fn element_name(&self) -> &str;

    /// Whether the editor can insert rich objects
    fn supports_objects(&self) -> bool;

    fn current_text(&self) -> String;

    fn cursor_offset(&self) -> usize;

    fn select_range(&mut self, range: Range<usize>);

    fn delete_selection_backward(&mut self);

    fn insert_object(&mut self, object: &Attachment);

    fn client_rect_at_offset(&self, offset: usize) -> Rect;

    /// Move input focus to the editor
    fn focus(&mut self, prevent_scroll: bool);

    fn set_attribute(&mut self, name: &str, value: &str);

    fn remove_attribute(&mut self, name: &str);
}

/// Where input focus currently sits, seen from the session's host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The editor itself is the active element
    Editor,
    /// The editor is the focused descendant of an embedding shadow root
    ShadowedEditor,
    /// Some other element has focus
    Elsewhere,
    Nothing,
}

impl FocusTarget {
    pub fn holds_editor(self) -> bool {
        matches!(self, FocusTarget::Editor | FocusTarget::ShadowedEditor)
    }
}

/// Origin of a platform event relative to the session's editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Editor,
    Other,
}

/// Element a session is attached to
pub trait Host: Send {
    /// The editing surface inside the host, if any
    fn editor(&mut self) -> Option<&mut dyn Editor>;

    fn focus(&self) -> FocusTarget;

    /// Append an ephemeral surface as a child of the host
    fn append(&mut self, surface: SurfaceRef);
}

/// Look up the host's editor, failing loudly on misuse
///
/// # Arguments
/// * `host` - Host the session is attached to
///
/// # Returns
/// * `Result<&mut dyn Editor>` - The editor, or a usage error when it is
///   absent or cannot insert objects
pub fn require_editor(host: &mut dyn Host) -> Result<&mut dyn Editor> {
    let editor = host.editor().ok_or(UsageError::EditorMissing)?;
    if !editor.supports_objects() {
        return Err(UsageError::UnsupportedEditor(editor.element_name().to_string()).into());
    }
    Ok(editor)
}
