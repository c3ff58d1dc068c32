//! The session state machine
//!
//! One [`Session`] per editor. Every platform event maps to one transition
//! method; the methods never block and never await. Negotiation is split in
//! two: [`Session::input`] hands out a [`Ticket`], the caller runs the
//! [`Negotiation`] built by [`Session::negotiate`], and feeds the outcome back
//! through [`Session::resolve`]. Other transitions may run in between.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::commit::{CommitListener, CommitResolution};
use super::menu::{Activation, MenuController};
use super::outcome::{CommitOutcome, InputOutcome, KeyOutcome, Phase, Resolution};
use crate::config::ExpanderConfig;
use crate::error::Result;
use crate::matcher::{KeySet, Lookback, Match, MatchContext, find_match};
use crate::negotiation::{
    self, MatchChange, MatchListener, Negotiation, NegotiationOutcome, ProviderListener,
    RemoteFrame, SuggestionProvider, Ticket,
};
use crate::surface::{
    AttachmentSpec, FrameLocator, Host, KeyPress, NavAction, NavigatorFactory, OptionItem,
    SurfaceRef, Target, require_editor,
};

/// When a negotiation outcome may still change the menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalenessPolicy {
    /// Act while any match is live, even a newer one.
    ///
    /// A surface negotiated for an earlier match can be shown for a later
    /// one when the two negotiations overlap.
    #[default]
    AnyActive,
    /// Act only for the negotiation of the live match
    SameMatch,
}

/// Per-session configuration, fixed at attach
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub keys: KeySet,
    /// Frame driven when no listener provides a result
    pub remote: Option<RemoteFrame>,
    pub staleness: StalenessPolicy,
    pub attachment: AttachmentSpec,
}

impl SessionOptions {
    pub fn new(keys: KeySet) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    pub fn with_remote(mut self, remote: RemoteFrame) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_staleness(mut self, staleness: StalenessPolicy) -> Self {
        self.staleness = staleness;
        self
    }

    pub fn with_attachment(mut self, attachment: AttachmentSpec) -> Self {
        self.attachment = attachment;
        self
    }

    /// Build options from the declarative configuration.
    ///
    /// The remote frame is only set up when `name`, `frame` and a locator are
    /// all present.
    pub fn from_config(config: &ExpanderConfig, locator: Option<Arc<dyn FrameLocator>>) -> Self {
        let keys = KeySet::from_attributes(Some(&config.keys), config.multiword.as_deref());
        let remote = match (&config.name, &config.frame, locator) {
            (Some(name), Some(frame), Some(locator)) => {
                Some(RemoteFrame::new(name.clone(), frame.clone(), locator))
            }
            _ => None,
        };

        Self {
            keys,
            remote,
            staleness: config.staleness,
            attachment: AttachmentSpec::new(config.attachment_attribute.clone()),
        }
    }
}

pub struct Session {
    host: Box<dyn Host>,
    options: SessionOptions,
    listeners: Vec<Arc<dyn MatchListener>>,
    commit_listeners: Vec<Arc<dyn CommitListener>>,
    menu: MenuController,
    look_back: Lookback,
    active_match: Option<Match>,
    /// Bumped for every match found
    generation: u64,
    /// Generation of the negotiation the live match is waiting on
    awaiting: Option<u64>,
    just_pasted: bool,
    interacting_with_pointer: bool,
}

impl Session {
    /// Attach a session to `host`
    ///
    /// # Arguments
    /// * `host` - Element owning the editor
    /// * `options` - Keys, remote frame, staleness policy, attachment source
    /// * `navigators` - Creates the list navigator for every activation
    ///
    /// # Returns
    /// * `Result<Session>` - A usage error when the host has no editor or the
    ///   editor cannot insert objects
    pub fn attach(
        mut host: Box<dyn Host>,
        options: SessionOptions,
        navigators: Arc<dyn NavigatorFactory>,
    ) -> Result<Self> {
        let editor = require_editor(host.as_mut())?;
        debug!(editor = editor.element_name(), keys = options.keys.len(), "session attached");

        Ok(Self {
            host,
            options,
            listeners: Vec::new(),
            commit_listeners: Vec::new(),
            menu: MenuController::new(navigators),
            look_back: Lookback::new(),
            active_match: None,
            generation: 0,
            awaiting: None,
            just_pasted: false,
            interacting_with_pointer: false,
        })
    }

    /// Tear down any open surface and hand the host back
    pub fn detach(mut self) -> Box<dyn Host> {
        self.menu.deactivate(self.host.as_mut());
        debug!("session detached");
        self.host
    }

    pub fn on_match_change<F>(&mut self, listener: F)
    where
        F: Fn(&mut MatchChange) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Register an async suggestion provider
    pub fn add_provider<P>(&mut self, provider: Arc<P>)
    where
        P: SuggestionProvider + 'static,
    {
        self.listeners.push(Arc::new(ProviderListener::new(provider)));
    }

    pub fn on_commit_resolution<F>(&mut self, listener: F)
    where
        F: for<'a> Fn(&mut CommitResolution<'a>) + Send + Sync + 'static,
    {
        self.commit_listeners.push(Arc::new(listener));
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn active_match(&self) -> Option<&Match> {
        self.active_match.as_ref()
    }

    pub fn look_back(&self) -> usize {
        self.look_back.index()
    }

    pub fn is_active(&self) -> bool {
        self.menu.is_active()
    }

    /// The surface currently shown, if any
    pub fn surface(&self) -> Option<SurfaceRef> {
        self.menu.surface()
    }

    pub fn phase(&self) -> Phase {
        match &self.active_match {
            Some(m) if self.menu.is_active() => Phase::Active(m.clone()),
            Some(m) if self.awaiting.is_some() => Phase::Pending(m.clone()),
            _ => Phase::Idle,
        }
    }

    /// Evaluate the editor after an input event
    pub fn input(&mut self, target: Target) -> Result<InputOutcome> {
        if target != Target::Editor {
            return Ok(InputOutcome::Ignored);
        }
        if self.just_pasted {
            self.just_pasted = false;
            debug!("input after paste skipped");
            return Ok(InputOutcome::Suppressed);
        }

        let editor = require_editor(self.host.as_mut())?;
        let text = editor.current_text();
        let cursor = editor.cursor_offset();
        let look_back = self.look_back.reopen(cursor);

        let ctx = MatchContext::at_cursor(cursor)
            .with_look_back(look_back)
            .with_active(self.active_match.as_ref());

        match find_match(&text, &self.options.keys, ctx) {
            Some(matched) => {
                self.generation += 1;
                self.awaiting = Some(self.generation);
                self.active_match = Some(matched.clone());
                debug!(
                    key = %matched.key,
                    text = %matched.text,
                    position = matched.position,
                    generation = self.generation,
                    "match in progress"
                );
                Ok(InputOutcome::Matched(Ticket {
                    generation: self.generation,
                    matched,
                }))
            }
            None => {
                self.active_match = None;
                self.awaiting = None;
                let closed = self.close_menu();
                Ok(InputOutcome::Cleared { closed })
            }
        }
    }

    /// Announce the ticket's match and build its negotiation
    pub fn negotiate(&self, ticket: Ticket) -> Negotiation {
        negotiation::negotiate(ticket, &self.listeners, self.options.remote.as_ref())
    }

    /// Apply a negotiation outcome
    pub fn resolve(&mut self, outcome: NegotiationOutcome) -> Result<Resolution> {
        let (ticket, surface) = match outcome {
            NegotiationOutcome::Resolved { ticket, surface } => (ticket, surface),
            NegotiationOutcome::Cancelled(ticket) => {
                debug!(generation = ticket.generation, "negotiation cancelled");
                return Ok(Resolution::Stale);
            }
        };

        if !self.is_current(&ticket) {
            debug!(generation = ticket.generation, "discarding stale negotiation");
            return Ok(Resolution::Stale);
        }
        if self.awaiting == Some(ticket.generation) {
            self.awaiting = None;
        }

        match surface {
            Some(surface) => {
                match self
                    .menu
                    .activate(self.host.as_mut(), &ticket.matched, surface)?
                {
                    Activation::Activated => Ok(Resolution::Activated),
                    Activation::Refused => Ok(Resolution::Refused),
                }
            }
            None => {
                let closed = self.close_menu();
                Ok(Resolution::Closed { closed })
            }
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        if self.active_match.is_none() {
            return false;
        }
        match self.options.staleness {
            StalenessPolicy::AnyActive => true,
            StalenessPolicy::SameMatch => self.awaiting == Some(ticket.generation),
        }
    }

    /// Skip the next input evaluation
    pub fn paste(&mut self, target: Target) {
        if target == Target::Editor {
            self.just_pasted = true;
        }
    }

    pub fn key_down(&mut self, target: Target, key: &KeyPress) -> Result<KeyOutcome> {
        if target != Target::Editor {
            return Ok(KeyOutcome::Passed);
        }

        if key.is_escape() {
            self.active_match = None;
            self.awaiting = None;
            return Ok(if self.close_and_hold_back() {
                KeyOutcome::Swallowed
            } else {
                KeyOutcome::Passed
            });
        }

        match self.menu.handle_key(key) {
            NavAction::Ignored => Ok(KeyOutcome::Passed),
            NavAction::Moved => Ok(KeyOutcome::Swallowed),
            NavAction::Commit(item) => Ok(KeyOutcome::Committed(self.commit(&item)?)),
        }
    }

    /// A pointer went down on the surface. Only counts while one is shown.
    pub fn pointer_down(&mut self) {
        if self.menu.is_active() {
            self.interacting_with_pointer = true;
        }
    }

    /// The editor lost focus. Returns whether a surface was closed.
    pub fn blur(&mut self, target: Target) -> bool {
        if target != Target::Editor {
            return false;
        }
        if self.interacting_with_pointer {
            self.interacting_with_pointer = false;
            return false;
        }
        self.close_and_hold_back()
    }

    /// Close the surface without committing. Returns whether one was open.
    pub fn dismiss(&mut self) -> bool {
        self.close_and_hold_back()
    }

    /// Deactivate the menu and forget any pointer interaction with it
    fn close_menu(&mut self) -> bool {
        self.interacting_with_pointer = false;
        self.menu.deactivate(self.host.as_mut())
    }

    fn close_and_hold_back(&mut self) -> bool {
        if !self.close_menu() {
            return false;
        }
        let cursor = self
            .host
            .editor()
            .map(|editor| editor.cursor_offset())
            .unwrap_or_default();
        self.look_back.dismiss_at(cursor);
        debug!(look_back = self.look_back.index(), "surface dismissed");
        true
    }

    /// Replace the live match with the object for `item`
    pub fn commit(&mut self, item: &OptionItem) -> Result<CommitOutcome> {
        if !self.menu.is_active() {
            return Ok(CommitOutcome::Ignored);
        }
        let Some(matched) = self.active_match.clone() else {
            return Ok(CommitOutcome::Ignored);
        };

        let mut resolution = CommitResolution::new(item, &matched.key);
        for listener in &self.commit_listeners {
            listener.on_commit_resolution(&mut resolution);
        }
        if resolution.is_canceled() {
            debug!(key = %matched.key, "commit vetoed");
            return Ok(CommitOutcome::Vetoed);
        }
        let object = resolution
            .into_value()
            .unwrap_or_else(|| self.options.attachment.build(item));

        let range = matched.replaced_range();
        let editor = require_editor(self.host.as_mut())?;
        editor.select_range(range.clone());
        editor.delete_selection_backward();
        editor.insert_object(&object);
        let cursor = editor.cursor_offset();

        self.close_menu();
        require_editor(self.host.as_mut())?.focus(true);

        self.look_back.set(cursor);
        self.active_match = None;
        self.awaiting = None;
        debug!(key = %matched.key, ?range, cursor, "option committed");

        Ok(CommitOutcome::Inserted {
            range,
            object,
            cursor,
        })
    }
}
