//! In-memory collaborators
//!
//! A plain-text editor with object placeholders, a host, surfaces, a list
//! navigator and remote frames. They back the playground and the tests; every
//! type is a cheap handle over shared state so a test can keep inspecting an
//! editor after boxing its host into a session.

mod editor;
mod frame;
mod navigator;
mod surface;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use editor::{CHAR_WIDTH, LINE_HEIGHT, MemoryEditor, MemoryHost, OBJECT_REPLACEMENT};
pub use frame::{MemoryFrame, MemoryFrames};
pub use navigator::{MemoryNavigator, MemoryNavigators};
pub use surface::MemorySurface;

/// Lock shared state; a panic in another holder does not make it unusable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
