use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::lock;
use crate::surface::{FrameLocator, OptionItem, Surface, SurfaceRef};

/// Base the relative frame sources are resolved against
const FRAME_BASE: &str = "http://localhost/";

#[derive(Debug, Default)]
struct FrameState {
    id: Option<String>,
    src: String,
    hidden: bool,
    connected: bool,
    position: Option<(f64, f64)>,
    /// Options served for any query
    catalog: Vec<OptionItem>,
    /// Options of the last load
    children: Vec<OptionItem>,
}

/// Remote content frame serving a fixed catalog.
///
/// A load keeps the catalog entries whose content starts with the `query`
/// parameter, ignoring case.
#[derive(Debug)]
pub struct MemoryFrame {
    disabled: bool,
    state: Mutex<FrameState>,
}

impl MemoryFrame {
    pub fn new(src: impl Into<String>, catalog: Vec<OptionItem>) -> Self {
        Self {
            disabled: false,
            state: Mutex::new(FrameState {
                src: src.into(),
                hidden: true,
                connected: true,
                catalog,
                ..FrameState::default()
            }),
        }
    }

    /// Frames marked disabled are never driven
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn src(&self) -> String {
        lock(&self.state).src.clone()
    }

    pub fn is_hidden(&self) -> bool {
        lock(&self.state).hidden
    }

    /// Point the frame at a new source and load it
    async fn load(&self, src: String, query: &str) {
        tokio::task::yield_now().await;

        let needle = query.to_lowercase();
        let mut state = lock(&self.state);
        state.children = state
            .catalog
            .iter()
            .filter(|item| item.content.to_lowercase().starts_with(&needle))
            .cloned()
            .collect();
        state.src = src;
    }
}

impl Surface for MemoryFrame {
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
        lock(&self.state).children.clone()
    }
}

/// Frames of a document, by id
#[derive(Debug, Default)]
pub struct MemoryFrames {
    frames: Mutex<HashMap<String, Arc<MemoryFrame>>>,
}

impl MemoryFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, frame: MemoryFrame) -> Arc<MemoryFrame> {
        let id = id.into();
        frame.set_id(id.clone());
        let frame = Arc::new(frame);
        lock(&self.frames).insert(id, frame.clone());
        frame
    }

    pub fn get(&self, id: &str) -> Option<Arc<MemoryFrame>> {
        lock(&self.frames).get(id).cloned()
    }

    /// Current source of a frame
    pub fn src(&self, id: &str) -> Option<String> {
        self.get(id).map(|frame| frame.src())
    }
}

#[async_trait]
impl FrameLocator for MemoryFrames {
    fn find(&self, frame_id: &str) -> Option<SurfaceRef> {
        let frame = self.get(frame_id)?;
        if frame.disabled {
            return None;
        }
        Some(frame)
    }

    async fn refresh_with_param(&self, frame: &SurfaceRef, name: &str, value: &str) {
        let Some(frame) = frame.id().and_then(|id| self.get(&id)) else {
            return;
        };

        let src = set_search_param(&frame.src(), name, value);
        debug!(%src, "reloading frame");
        frame.load(src, value).await;
    }
}

/// Set `name=value` in the query of `src`, replacing earlier values of `name`
fn set_search_param(src: &str, name: &str, value: &str) -> String {
    let Ok(mut url) = Url::parse(FRAME_BASE).and_then(|base| base.join(src)) else {
        return src.to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(name, value);

    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
