//! Sessions by owner
//!
//! Each element a session is attached to gets one entry, inserted on attach
//! and removed on detach.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::expander::{EditorEvent, Expander, Reaction};
use crate::error::{Result, UsageError};
use crate::session::{Session, SessionOptions};
use crate::surface::{Host, NavigatorFactory};

/// Identity of the element owning a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<OwnerId, Expander>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session for `owner`
    ///
    /// # Arguments
    /// * `owner` - Element identity; must not have a session yet
    /// * `host` - The element itself
    /// * `options` - Session configuration
    /// * `navigators` - Navigator factory for the session's menus
    pub fn attach(
        &mut self,
        owner: OwnerId,
        host: Box<dyn Host>,
        options: SessionOptions,
        navigators: Arc<dyn NavigatorFactory>,
    ) -> Result<&mut Expander> {
        if self.sessions.contains_key(&owner) {
            return Err(UsageError::SessionExists(owner.0).into());
        }

        let session = Session::attach(host, options, navigators)?;
        info!(%owner, "attached mention session");
        Ok(self
            .sessions
            .entry(owner)
            .or_insert_with(|| Expander::new(session)))
    }

    /// Remove the session for `owner`, closing its surface
    pub fn detach(&mut self, owner: OwnerId) -> Result<Box<dyn Host>> {
        let expander = self
            .sessions
            .remove(&owner)
            .ok_or(UsageError::UnknownSession(owner.0))?;
        info!(%owner, "detached mention session");
        Ok(expander.detach())
    }

    pub fn get(&self, owner: OwnerId) -> Option<&Expander> {
        self.sessions.get(&owner)
    }

    pub fn get_mut(&mut self, owner: OwnerId) -> Option<&mut Expander> {
        self.sessions.get_mut(&owner)
    }

    /// Route an event to the session of `owner`
    pub async fn dispatch(&mut self, owner: OwnerId, event: EditorEvent) -> Result<Reaction> {
        let expander = self
            .sessions
            .get_mut(&owner)
            .ok_or(UsageError::UnknownSession(owner.0))?;
        expander.dispatch(event).await
    }

    /// Close the surface of `owner`'s session.
    ///
    /// Unknown owners are ignored.
    pub fn dismiss(&mut self, owner: OwnerId) -> bool {
        match self.sessions.get_mut(&owner) {
            Some(expander) => {
                expander.supersede();
                expander.session_mut().dismiss()
            }
            None => false,
        }
    }

    pub fn contains(&self, owner: OwnerId) -> bool {
        self.sessions.contains_key(&owner)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
