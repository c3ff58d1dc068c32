//! Collaborator contracts consumed by a mention session
//!
//! The session never touches a platform directly. It talks to:
//!
//! - **Editor**: text, cursor, range replacement and object insertion
//! - **Host**: the element the session is attached to; owns the editor,
//!   reports focus and adopts ephemeral surfaces
//! - **Surface**: the element hosting suggestion options
//! - **ListNavigator**: keyboard navigation over a surface's options
//! - **FrameLocator**: remote content frames that can be refreshed with a query
//!
//! Option items and the object built from them on commit live here too.

mod attachment;
mod editor;
mod element;
mod frame;
mod navigator;

pub use attachment::{Attachment, AttachmentSpec, DEFAULT_ATTACHMENT_ATTRIBUTE};
pub use editor::{Editor, FocusTarget, Host, Rect, Target, require_editor};
pub use element::{OptionItem, Surface, SurfaceRef};
pub use frame::FrameLocator;
pub use navigator::{KeyPress, ListNavigator, NavAction, NavigatorFactory};
