//! The "commit resolution" signal

use crate::surface::{Attachment, OptionItem};

/// Fired once per commit, before the inserted object is built.
///
/// A listener may replace the object by filling `value`, or veto the commit.
#[derive(Debug)]
pub struct CommitResolution<'a> {
    /// The chosen option
    pub item: &'a OptionItem,
    /// Trigger literal of the committed match
    pub key: &'a str,
    value: Option<Attachment>,
    canceled: bool,
}

impl<'a> CommitResolution<'a> {
    pub(crate) fn new(item: &'a OptionItem, key: &'a str) -> Self {
        Self {
            item,
            key,
            value: None,
            canceled: false,
        }
    }

    /// Insert `value` instead of the object built from the option
    pub fn set_value(&mut self, value: Attachment) {
        self.value = Some(value);
    }

    pub fn value(&self) -> Option<&Attachment> {
        self.value.as_ref()
    }

    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub(crate) fn into_value(self) -> Option<Attachment> {
        self.value
    }
}

/// Receives every "commit resolution" signal of a session
pub trait CommitListener: Send + Sync {
    fn on_commit_resolution(&self, resolution: &mut CommitResolution<'_>);
}

impl<F> CommitListener for F
where
    F: Fn(&mut CommitResolution<'_>) + Send + Sync,
{
    fn on_commit_resolution(&self, resolution: &mut CommitResolution<'_>) {
        self(resolution)
    }
}
