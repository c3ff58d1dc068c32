//! Provider negotiation
//!
//! When the matcher reports a match, the session announces it as a
//! cancelable [`MatchChange`]. Listeners may call `provide` any number of
//! times, synchronously or with a future. The negotiation then:
//!
//! 1. yields no surface when a listener cancelled the change
//! 2. waits for every provided result and picks the first matched one, in
//!    registration order
//! 3. otherwise delegates to the remote content frame, if configured
//!
//! A [`Negotiation`] is a cancellable future; the async driver cancels it
//! when a newer input evaluation supersedes it.

mod change;
mod task;

pub use change::{MatchChange, MatchListener, ProviderListener, ProviderResult, SuggestionProvider};
pub use task::{Negotiation, NegotiationOutcome, RemoteFrame, Ticket, negotiate};
