//! Remote content frames

use async_trait::async_trait;

use super::element::SurfaceRef;

/// Locates remote content frames and asks them to reload with a query
#[async_trait]
pub trait FrameLocator: Send + Sync {
    /// Find a frame by id; disabled frames are never returned
    fn find(&self, frame_id: &str) -> Option<SurfaceRef>;

    /// Set `name=value` on the frame's source and wait for it to load
    async fn refresh_with_param(&self, frame: &SurfaceRef, name: &str, value: &str);
}
