use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::surface::{Attachment, Editor, FocusTarget, Host, Rect, SurfaceRef};

/// Char standing in for an inserted object in the editor text
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Width of one char in the monospace layout
pub const CHAR_WIDTH: f64 = 8.0;

pub const LINE_HEIGHT: f64 = 16.0;

#[derive(Debug)]
struct EditorState {
    text: Vec<char>,
    cursor: usize,
    selection: Option<Range<usize>>,
    objects: Vec<Attachment>,
    attributes: BTreeMap<String, String>,
    focus: FocusTarget,
    last_focus_prevented_scroll: Option<bool>,
}

/// Plain-text editor handle; clones share the same document
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    name: String,
    supports_objects: bool,
    state: Arc<Mutex<EditorState>>,
}

impl MemoryEditor {
    /// Editor that accepts objects, with focus
    pub fn rich() -> Self {
        Self::build("trix-editor", true)
    }

    /// Editor of another kind, e.g. a `textarea`
    pub fn plain(name: impl Into<String>) -> Self {
        Self::build(name, false)
    }

    fn build(name: impl Into<String>, supports_objects: bool) -> Self {
        Self {
            name: name.into(),
            supports_objects,
            state: Arc::new(Mutex::new(EditorState {
                text: Vec::new(),
                cursor: 0,
                selection: None,
                objects: Vec::new(),
                attributes: BTreeMap::new(),
                focus: FocusTarget::Editor,
                last_focus_prevented_scroll: None,
            })),
        }
    }

    /// Insert `text` at the cursor
    pub fn type_text(&self, text: &str) {
        let mut state = lock(&self.state);
        let at = state.cursor;
        state.text.splice(at..at, text.chars());
        state.cursor = at + text.chars().count();
    }

    /// Replace the document, leaving the cursor at the end
    pub fn set_text(&self, text: &str) {
        let mut state = lock(&self.state);
        state.text = text.chars().collect();
        state.cursor = state.text.len();
        state.selection = None;
    }

    /// Delete the char before the cursor
    pub fn backspace(&self) {
        let mut state = lock(&self.state);
        if state.cursor > 0 {
            let at = state.cursor - 1;
            state.text.remove(at);
            state.cursor = at;
        }
    }

    pub fn move_cursor(&self, offset: usize) {
        let mut state = lock(&self.state);
        state.cursor = offset.min(state.text.len());
    }

    pub fn set_focus(&self, focus: FocusTarget) {
        lock(&self.state).focus = focus;
    }

    pub fn focus_target(&self) -> FocusTarget {
        lock(&self.state).focus
    }

    /// `prevent_scroll` of the last `focus` call
    pub fn last_focus_prevented_scroll(&self) -> Option<bool> {
        lock(&self.state).last_focus_prevented_scroll
    }

    pub fn text(&self) -> String {
        lock(&self.state).text.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        lock(&self.state).cursor
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        lock(&self.state).attributes.get(name).cloned()
    }

    /// Objects in insertion order
    pub fn objects(&self) -> Vec<Attachment> {
        lock(&self.state).objects.clone()
    }
}

impl Editor for MemoryEditor {
    fn element_name(&self) -> &str {
        &self.name
    }

    fn supports_objects(&self) -> bool {
        self.supports_objects
    }

    fn current_text(&self) -> String {
        self.text()
    }

    fn cursor_offset(&self) -> usize {
        self.cursor()
    }

    fn select_range(&mut self, range: Range<usize>) {
        let mut state = lock(&self.state);
        let len = state.text.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        state.selection = Some(start..end);
        state.cursor = end;
    }

    fn delete_selection_backward(&mut self) {
        let mut state = lock(&self.state);
        match state.selection.take() {
            Some(range) if !range.is_empty() => {
                state.cursor = range.start;
                state.text.drain(range);
            }
            _ => {
                if state.cursor > 0 {
                    let at = state.cursor - 1;
                    state.text.remove(at);
                    state.cursor = at;
                }
            }
        }
    }

    fn insert_object(&mut self, object: &Attachment) {
        let mut state = lock(&self.state);
        let at = state.cursor;
        state.text.insert(at, OBJECT_REPLACEMENT);
        state.cursor = at + 1;
        state.objects.push(object.clone());
    }

    fn client_rect_at_offset(&self, offset: usize) -> Rect {
        let state = lock(&self.state);
        let before = &state.text[..offset.min(state.text.len())];
        let line = before.iter().filter(|c| **c == '\n').count();
        let column = before.iter().rev().take_while(|c| **c != '\n').count();

        let top = line as f64 * LINE_HEIGHT;
        let left = column as f64 * CHAR_WIDTH;
        Rect {
            top,
            left,
            bottom: top + LINE_HEIGHT,
            right: left + CHAR_WIDTH,
        }
    }

    fn focus(&mut self, prevent_scroll: bool) {
        let mut state = lock(&self.state);
        if state.focus != FocusTarget::ShadowedEditor {
            state.focus = FocusTarget::Editor;
        }
        state.last_focus_prevented_scroll = Some(prevent_scroll);
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        lock(&self.state)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        lock(&self.state).attributes.remove(name);
    }
}

/// Host element; focus is reported by its editor
#[derive(Debug, Clone)]
pub struct MemoryHost {
    editor: Option<MemoryEditor>,
    appended: Arc<Mutex<Vec<SurfaceRef>>>,
}

impl MemoryHost {
    pub fn new(editor: MemoryEditor) -> Self {
        Self {
            editor: Some(editor),
            appended: Arc::default(),
        }
    }

    /// Host without an editor
    pub fn empty() -> Self {
        Self {
            editor: None,
            appended: Arc::default(),
        }
    }

    /// Number of surfaces ever appended
    pub fn appended(&self) -> usize {
        lock(&self.appended).len()
    }
}

impl Host for MemoryHost {
    fn editor(&mut self) -> Option<&mut dyn Editor> {
        self.editor.as_mut().map(|editor| editor as &mut dyn Editor)
    }

    fn focus(&self) -> FocusTarget {
        match &self.editor {
            Some(editor) => editor.focus_target(),
            None => FocusTarget::Nothing,
        }
    }

    fn append(&mut self, surface: SurfaceRef) {
        surface.attach();
        lock(&self.appended).push(surface);
    }
}
