//! Menu controller
//!
//! Owns the suggestion surface and its list navigator while a mention is
//! active. At most one surface is active per session; activating a new one
//! tears the previous one down first.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::matcher::Match;
use crate::surface::{
    Host, KeyPress, ListNavigator, NavAction, NavigatorFactory, SurfaceRef, require_editor,
};

/// Whether an activation took effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated,
    /// The editor did not hold focus
    Refused,
}

/// The surface currently shown and how it got into the document
struct MenuHandle {
    surface: SurfaceRef,
    /// The surface was in the document before activation and is only hidden
    /// on deactivation
    was_attached: bool,
}

pub struct MenuController {
    navigators: Arc<dyn NavigatorFactory>,
    handle: Option<MenuHandle>,
    navigator: Option<Box<dyn ListNavigator>>,
}

impl MenuController {
    pub fn new(navigators: Arc<dyn NavigatorFactory>) -> Self {
        Self {
            navigators,
            handle: None,
            navigator: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// The active surface, if any
    pub fn surface(&self) -> Option<SurfaceRef> {
        self.handle.as_ref().map(|h| h.surface.clone())
    }

    /// Show `surface` for `matched`
    ///
    /// # Arguments
    /// * `host` - Host owning the editor; ephemeral surfaces are appended to it
    /// * `matched` - Match the surface was negotiated for; the surface is
    ///   placed under the first captured char
    /// * `surface` - Surface produced by the negotiation
    ///
    /// # Returns
    /// * `Result<Activation>` - `Refused` when the editor does not hold focus
    pub fn activate(
        &mut self,
        host: &mut dyn Host,
        matched: &Match,
        surface: SurfaceRef,
    ) -> Result<Activation> {
        if !host.focus().holds_editor() {
            warn!(key = %matched.key, "editor lost focus, not showing suggestions");
            return Ok(Activation::Refused);
        }
        require_editor(host)?;

        self.deactivate(host);

        let was_attached = surface.is_connected();
        if surface.id().is_none() {
            surface.set_id(generate_id());
        }
        if was_attached {
            surface.set_hidden(false);
        } else {
            host.append(surface.clone());
        }

        let editor = require_editor(host)?;
        let mut navigator = self.navigators.create(&*editor, surface.clone());
        editor.set_attribute("role", "combobox");
        editor.set_attribute("aria-multiline", "false");

        let rect = editor.client_rect_at_offset(matched.position);
        surface.place(rect.bottom, rect.left);

        navigator.start();
        navigator.navigate(1);

        debug!(id = ?surface.id(), was_attached, "menu activated");
        self.navigator = Some(navigator);
        self.handle = Some(MenuHandle {
            surface,
            was_attached,
        });
        Ok(Activation::Activated)
    }

    /// Tear down the active surface.
    ///
    /// Safe to call when nothing is active. Returns whether anything was torn
    /// down.
    pub fn deactivate(&mut self, host: &mut dyn Host) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };

        if let Some(mut navigator) = self.navigator.take() {
            navigator.destroy();
        }

        // The editor may already be gone when the session detaches.
        if let Some(editor) = host.editor() {
            editor.remove_attribute("aria-multiline");
            editor.set_attribute("role", "textbox");
        }

        if handle.was_attached {
            handle.surface.set_hidden(true);
        } else {
            handle.surface.remove();
        }

        debug!(id = ?handle.surface.id(), "menu deactivated");
        true
    }

    /// Forward a key to the active navigator
    pub fn handle_key(&mut self, key: &KeyPress) -> NavAction {
        match self.navigator.as_mut() {
            Some(navigator) => navigator.handle_key(key),
            None => NavAction::Ignored,
        }
    }
}

fn generate_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("mentions-{}", &uuid[..8])
}
