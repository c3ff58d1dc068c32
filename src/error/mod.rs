//! Error handling for mention sessions.
//!
//! Only programmer misuse and configuration problems surface as errors.
//! Everything the session treats as a normal outcome (a cancelled
//! negotiation, a vetoed commit, a stale provider resolution) is reported
//! through the transition return values instead.
//!
//! # Example
//!
//! ```rust
//! use mentions::error::{MentionsError, Result, UsageError};
//!
//! fn lookup(found: bool) -> Result<()> {
//!     if !found {
//!         return Err(UsageError::EditorMissing.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(lookup(false), Err(MentionsError::Usage(_))));
//! ```

pub mod kinds;

pub use kinds::{ConfigError, MentionsError, Result, UsageError};
