//! Trigger detection for mention sessions
//!
//! This module decides, for a snapshot of the editor text and cursor, whether a
//! mention is in progress and which part of the text it spans.
//!
//! # Architecture
//!
//! - **Key / KeySet**: configured trigger literals and their word mode
//! - **Match**: the captured text, the trigger that fired and where the
//!   captured text starts
//! - **Query**: the pure matcher (`find_match`)
//! - **Lookback**: the per-session lower bound that keeps a dismissed trigger
//!   from re-opening on the next keystroke
//!
//! All offsets are counted in `char`s.
//!
//! # Examples
//!
//! ```
//! use mentions::matcher::{find_match, Key, KeySet, MatchContext};
//!
//! let keys = KeySet::new(vec![Key::single("@"), Key::multi("#")]);
//! let text = "@match #some text";
//! let found = find_match(text, &keys, MatchContext::at_cursor(17)).unwrap();
//!
//! assert_eq!(found.key, "#");
//! assert_eq!(found.text, "some text");
//! assert_eq!(found.position, 8);
//! ```

mod key;
mod lookback;
mod query;

pub use key::{Key, KeySet, Match};
pub use lookback::Lookback;
pub use query::{MatchContext, find_match};
