use std::sync::{Arc, Mutex};

use super::lock;
use crate::surface::{OptionItem, Surface};

#[derive(Debug, Default)]
struct SurfaceState {
    id: Option<String>,
    connected: bool,
    hidden: bool,
    position: Option<(f64, f64)>,
    options: Vec<OptionItem>,
}

/// Option list element
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    /// Detached surface, appended to the host on activation
    pub fn new(options: Vec<OptionItem>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SurfaceState {
                options,
                ..SurfaceState::default()
            }),
        })
    }

    pub fn with_id(id: impl Into<String>, options: Vec<OptionItem>) -> Arc<Self> {
        let surface = Self::new(options);
        lock(&surface.state).id = Some(id.into());
        surface
    }

    /// Hidden surface already part of the document
    pub fn in_document(options: Vec<OptionItem>) -> Arc<Self> {
        let surface = Self::new(options);
        {
            let mut state = lock(&surface.state);
            state.connected = true;
            state.hidden = true;
        }
        surface
    }

    pub fn set_options(&self, options: Vec<OptionItem>) {
        lock(&self.state).options = options;
    }

    pub fn is_hidden(&self) -> bool {
        lock(&self.state).hidden
    }

    /// Top/left of the last placement
    pub fn position(&self) -> Option<(f64, f64)> {
        lock(&self.state).position
    }
}

impl Surface for MemorySurface {
    fn id(&self) -> Option<String> {
        lock(&self.state).id.clone()
    }

    fn set_id(&self, id: String) {
        lock(&self.state).id = Some(id);
    }

    fn is_connected(&self) -> bool {
        lock(&self.state).connected
    }

    fn attach(&self) {
        lock(&self.state).connected = true;
    }

    fn remove(&self) {
        lock(&self.state).connected = false;
    }

    fn set_hidden(&self, hidden: bool) {
        lock(&self.state).hidden = hidden;
    }

    fn place(&self, top: f64, left: f64) {
        lock(&self.state).position = Some((top, left));
    }

    fn options(&self) -> Vec<OptionItem> {
        lock(&self.state).options.clone()
    }
}
