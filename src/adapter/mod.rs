//! Platform-facing layer
//!
//! - **Expander**: turns decoded [`EditorEvent`]s into session transitions
//!   and drives negotiations, cancelling superseded ones
//! - **SessionRegistry**: one expander per owning element
//! - **memory**: in-memory editor, host, surfaces, navigator and frames

mod expander;
mod memory;
mod registry;

pub use expander::{EditorEvent, Expander, Reaction, Step};
pub use memory::{
    CHAR_WIDTH, LINE_HEIGHT, MemoryEditor, MemoryFrame, MemoryFrames, MemoryHost, MemoryNavigator,
    MemoryNavigators, MemorySurface, OBJECT_REPLACEMENT,
};
pub use registry::{OwnerId, SessionRegistry};
