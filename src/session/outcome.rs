//! Results of session transitions

use std::ops::Range;

use crate::matcher::Match;
use crate::negotiation::Ticket;
use crate::surface::Attachment;

/// Where a session's mention lifecycle currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A match was found and its negotiation has not resolved yet
    Pending(Match),
    /// A surface is showing suggestions for the match
    Active(Match),
}

/// Result of an input evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The event did not target the editor
    Ignored,
    /// The evaluation was skipped once after a paste
    Suppressed,
    /// No mention is in progress; `closed` tells whether a surface was torn down
    Cleared { closed: bool },
    /// A mention is in progress; negotiate the ticket next
    Matched(Ticket),
}

/// What the session did with a negotiation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The outcome no longer applies and was discarded
    Stale,
    Activated,
    /// A surface arrived but the editor does not hold focus
    Refused,
    /// No surface was produced
    Closed { closed: bool },
}

/// What the session did with a key press
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Let the key reach the editor
    Passed,
    /// Stop propagation and prevent the default action
    Swallowed,
    /// The navigator committed an option
    Committed(CommitOutcome),
}

/// Result of a commit signal
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// No surface or no match was active
    Ignored,
    /// A commit listener cancelled the insertion
    Vetoed,
    Inserted {
        /// Editor range that was replaced
        range: Range<usize>,
        object: Attachment,
        /// Cursor after the insertion
        cursor: usize,
    },
}
