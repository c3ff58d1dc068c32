//! Event adapter and async driver
//!
//! Decodes platform events into session transitions and drives
//! negotiations. An input evaluation that supersedes an in-flight
//! negotiation cancels it.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Result;
use crate::negotiation::{Negotiation, NegotiationOutcome};
use crate::session::{CommitOutcome, InputOutcome, KeyOutcome, Resolution, Session};
use crate::surface::{Host, KeyPress, OptionItem, Target};

/// A platform event, already attributed to its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Input(Target),
    Paste(Target),
    KeyDown { target: Target, key: KeyPress },
    FocusOut(Target),
    /// Pointer down on the active surface
    PointerDown,
    /// The navigator or a click committed an option
    Commit(OptionItem),
    /// Programmatic dismissal
    Dismiss,
}

/// What the session did with an event
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// Paste and pointer events only record state
    Recorded,
    Input(InputOutcome),
    /// The input found a match and its negotiation ran to completion
    Negotiated(Resolution),
    Key(KeyOutcome),
    /// Focus loss or dismissal; `true` when a surface was closed
    Closed(bool),
    Commit(CommitOutcome),
}

/// First half of handling an event
#[derive(Debug)]
pub enum Step {
    Done(Reaction),
    /// Run the negotiation, then hand its outcome to [`Expander::finish`]
    Negotiate(Negotiation),
}

/// Owns a session and its in-flight negotiation
pub struct Expander {
    session: Session,
    inflight: Option<(u64, CancellationToken)>,
}

impl Expander {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            inflight: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Apply the synchronous part of an event
    pub fn begin(&mut self, event: EditorEvent) -> Result<Step> {
        let reaction = match event {
            EditorEvent::Input(target) => match self.session.input(target)? {
                InputOutcome::Matched(ticket) => {
                    self.supersede();
                    let negotiation = self.session.negotiate(ticket);
                    self.inflight = Some((
                        negotiation.ticket().generation,
                        negotiation.cancel_token(),
                    ));
                    return Ok(Step::Negotiate(negotiation));
                }
                outcome @ InputOutcome::Cleared { .. } => {
                    self.supersede();
                    Reaction::Input(outcome)
                }
                outcome => Reaction::Input(outcome),
            },
            EditorEvent::Paste(target) => {
                self.session.paste(target);
                Reaction::Recorded
            }
            EditorEvent::KeyDown { target, key } => {
                if target == Target::Editor && key.is_escape() {
                    self.supersede();
                }
                Reaction::Key(self.session.key_down(target, &key)?)
            }
            EditorEvent::FocusOut(target) => Reaction::Closed(self.session.blur(target)),
            EditorEvent::PointerDown => {
                self.session.pointer_down();
                Reaction::Recorded
            }
            EditorEvent::Commit(item) => Reaction::Commit(self.session.commit(&item)?),
            EditorEvent::Dismiss => {
                self.supersede();
                Reaction::Closed(self.session.dismiss())
            }
        };
        Ok(Step::Done(reaction))
    }

    /// Apply a negotiation outcome
    pub fn finish(&mut self, outcome: NegotiationOutcome) -> Result<Resolution> {
        let generation = outcome.ticket().generation;
        if self.inflight.as_ref().is_some_and(|(g, _)| *g == generation) {
            self.inflight = None;
        }
        self.session.resolve(outcome)
    }

    /// Handle an event, running its negotiation to completion
    pub async fn dispatch(&mut self, event: EditorEvent) -> Result<Reaction> {
        match self.begin(event)? {
            Step::Done(reaction) => Ok(reaction),
            Step::Negotiate(negotiation) => {
                let outcome = negotiation.run().await;
                Ok(Reaction::Negotiated(self.finish(outcome)?))
            }
        }
    }

    /// Cancel the in-flight negotiation, if any
    pub fn supersede(&mut self) {
        if let Some((generation, token)) = self.inflight.take() {
            debug!(generation, "cancelling superseded negotiation");
            token.cancel();
        }
    }

    /// Whether a negotiation is waiting for its outcome
    pub fn is_negotiating(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn detach(mut self) -> Box<dyn Host> {
        self.supersede();
        self.session.detach()
    }
}
