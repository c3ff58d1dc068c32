//! Mention sessions for rich-text editors
//!
//! This library detects `@`-style mention triggers in editor text and runs
//! the suggestion session around them: announcing matches to listeners,
//! negotiating a suggestion surface, positioning it at the caret, routing
//! keyboard navigation and replacing the typed trigger with a structured
//! object on commit.
//!
//! # Modules
//!
//! - `matcher`: Pure trigger detection over a text snapshot
//! - `negotiation`: The "match changed" signal, providers and remote frames
//! - `surface`: Collaborator traits (editor, host, surface, navigator, frames)
//! - `session`: The per-editor state machine
//! - `adapter`: Event decoding, negotiation driving and in-memory collaborators
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `cli`: Command-line interface and argument parsing
//! - `playground`: Command-driven front end used by the binary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mentions::adapter::{EditorEvent, Expander, MemoryEditor, MemoryHost, MemoryNavigators};
//! use mentions::matcher::{Key, KeySet};
//! use mentions::session::{Session, SessionOptions};
//! use mentions::surface::Target;
//!
//! #[tokio::main]
//! async fn main() -> mentions::Result<()> {
//!     let editor = MemoryEditor::rich();
//!     let session = Session::attach(
//!         Box::new(MemoryHost::new(editor.clone())),
//!         SessionOptions::new(KeySet::new(vec![Key::single("@")])),
//!         Arc::new(MemoryNavigators::new()),
//!     )?;
//!     let mut expander = Expander::new(session);
//!
//!     editor.type_text("hello @al");
//!     let reaction = expander.dispatch(EditorEvent::Input(Target::Editor)).await?;
//!     println!("{reaction:?}");
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod negotiation;
pub mod playground;
pub mod session;
pub mod surface;

// Re-export commonly used types
pub use adapter::{EditorEvent, Expander, Reaction, SessionRegistry};
pub use config::Config;
pub use error::{MentionsError, Result};
pub use matcher::{Key, KeySet, Match, find_match};
pub use session::{Session, SessionOptions, StalenessPolicy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
