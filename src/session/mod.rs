//! Mention sessions
//!
//! A session owns one editor's mention lifecycle:
//!
//! ```text
//! Idle --match--> Pending --surface--> Active
//!   ^               |                    |
//!   +---no surface--+                    |
//!   +-----dismiss / commit / no match----+
//! ```
//!
//! Transitions are plain methods taking the decoded platform event; the
//! session never subscribes to anything itself. The menu controller owns the
//! surface and the list navigator while a match is active.

mod commit;
mod menu;
mod outcome;
mod state;

pub use commit::{CommitListener, CommitResolution};
pub use menu::{Activation, MenuController};
pub use outcome::{CommitOutcome, InputOutcome, KeyOutcome, Phase, Resolution};
pub use state::{Session, SessionOptions, StalenessPolicy};
