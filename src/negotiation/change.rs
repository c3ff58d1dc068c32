//! The "match changed" signal and its listeners

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::matcher::Match;
use crate::surface::SurfaceRef;

/// A provider's answer for one match
#[derive(Debug, Clone)]
pub struct ProviderResult {
    /// Surface holding the suggestions
    pub fragment: SurfaceRef,
    /// Whether the provider has suggestions for the text
    pub matched: bool,
}

impl ProviderResult {
    pub fn matched(fragment: SurfaceRef) -> Self {
        Self {
            fragment,
            matched: true,
        }
    }

    pub fn unmatched(fragment: SurfaceRef) -> Self {
        Self {
            fragment,
            matched: false,
        }
    }
}

/// Cancelable announcement of a candidate match
pub struct MatchChange {
    key: String,
    text: String,
    provided: Vec<BoxFuture<'static, Option<ProviderResult>>>,
    canceled: bool,
}

impl MatchChange {
    pub(crate) fn new(matched: &Match) -> Self {
        Self {
            key: matched.key.clone(),
            text: matched.text.clone(),
            provided: Vec::new(),
            canceled: false,
        }
    }

    /// Trigger literal that fired
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Text captured after the trigger
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Supply a result that is already known
    pub fn provide(&mut self, result: ProviderResult) {
        self.provided.push(future::ready(Some(result)).boxed());
    }

    /// Supply a result that resolves later; `None` counts as not matched
    pub fn provide_with<F>(&mut self, result: F)
    where
        F: Future<Output = Option<ProviderResult>> + Send + 'static,
    {
        self.provided.push(result.boxed());
    }

    /// Veto the negotiation; the session treats it as "no surface"
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub fn provided_count(&self) -> usize {
        self.provided.len()
    }

    pub(crate) fn into_provided(self) -> Vec<BoxFuture<'static, Option<ProviderResult>>> {
        self.provided
    }
}

impl std::fmt::Debug for MatchChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchChange")
            .field("key", &self.key)
            .field("text", &self.text)
            .field("provided", &self.provided.len())
            .field("canceled", &self.canceled)
            .finish()
    }
}

/// Receives every "match changed" signal of a session
pub trait MatchListener: Send + Sync {
    fn on_match_change(&self, change: &mut MatchChange);
}

impl<F> MatchListener for F
where
    F: Fn(&mut MatchChange) + Send + Sync,
{
    fn on_match_change(&self, change: &mut MatchChange) {
        self(change)
    }
}

/// Asynchronous source of suggestions
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Suggestions for `text` typed after `key`, or `None` when there are none
    async fn suggest(&self, key: &str, text: &str) -> Option<ProviderResult>;
}

/// Registers a [`SuggestionProvider`] as a match listener
pub struct ProviderListener<P> {
    provider: Arc<P>,
}

impl<P> ProviderListener<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

impl<P> MatchListener for ProviderListener<P>
where
    P: SuggestionProvider + 'static,
{
    fn on_match_change(&self, change: &mut MatchChange) {
        let provider = self.provider.clone();
        let key = change.key().to_string();
        let text = change.text().to_string();
        change.provide_with(async move { provider.suggest(&key, &text).await });
    }
}
