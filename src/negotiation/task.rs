//! Negotiation futures and their outcome

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture, join_all};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::change::{MatchChange, MatchListener, ProviderResult};
use crate::matcher::Match;
use crate::surface::{FrameLocator, SurfaceRef};

/// Identifies the input evaluation a negotiation was started for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Session-local counter, bumped for every match found
    pub generation: u64,
    pub matched: Match,
}

/// Delegation target used when no listener provides a result
#[derive(Clone)]
pub struct RemoteFrame {
    name: String,
    frame_id: String,
    locator: Arc<dyn FrameLocator>,
}

impl RemoteFrame {
    /// # Arguments
    /// * `name` - Query parameter the captured text is written to
    /// * `frame_id` - Id of the frame to refresh
    /// * `locator` - Frame lookup and refresh collaborator
    pub fn new(
        name: impl Into<String>,
        frame_id: impl Into<String>,
        locator: Arc<dyn FrameLocator>,
    ) -> Self {
        Self {
            name: name.into(),
            frame_id: frame_id.into(),
            locator,
        }
    }

    /// Refresh the frame with the captured text; the frame is the surface
    /// when it has content afterwards
    fn drive(&self, text: String) -> BoxFuture<'static, Option<SurfaceRef>> {
        let Some(frame) = self.locator.find(&self.frame_id) else {
            debug!(frame = %self.frame_id, "remote frame not available");
            return future::ready(None).boxed();
        };

        let locator = self.locator.clone();
        let name = self.name.clone();
        async move {
            locator.refresh_with_param(&frame, &name, &text).await;
            if frame.child_count() > 0 {
                Some(frame)
            } else {
                None
            }
        }
        .boxed()
    }
}

impl fmt::Debug for RemoteFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteFrame")
            .field("name", &self.name)
            .field("frame_id", &self.frame_id)
            .finish()
    }
}

/// Pending negotiation for one ticket
pub struct Negotiation {
    ticket: Ticket,
    token: CancellationToken,
    work: BoxFuture<'static, Option<SurfaceRef>>,
}

/// How a negotiation ended
#[derive(Debug, Clone)]
pub enum NegotiationOutcome {
    /// Providers answered; `surface` is `None` when nothing matched
    Resolved {
        ticket: Ticket,
        surface: Option<SurfaceRef>,
    },
    /// A newer evaluation superseded this one
    Cancelled(Ticket),
}

impl NegotiationOutcome {
    pub fn ticket(&self) -> &Ticket {
        match self {
            NegotiationOutcome::Resolved { ticket, .. } => ticket,
            NegotiationOutcome::Cancelled(ticket) => ticket,
        }
    }
}

impl Negotiation {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Token that aborts this negotiation when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the providers or for cancellation, whichever comes first
    pub async fn run(self) -> NegotiationOutcome {
        let Negotiation {
            ticket,
            token,
            work,
        } = self;

        tokio::select! {
            biased;
            _ = token.cancelled() => NegotiationOutcome::Cancelled(ticket),
            surface = work => NegotiationOutcome::Resolved { ticket, surface },
        }
    }
}

impl fmt::Debug for Negotiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiation")
            .field("ticket", &self.ticket)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

/// Announce a match to the listeners and build the negotiation future
///
/// Listeners run synchronously, in registration order. A cancelled change
/// never reaches the providers or the remote frame.
///
/// # Arguments
/// * `ticket` - The match being negotiated
/// * `listeners` - Registered "match changed" listeners
/// * `remote` - Fallback frame used when nobody provides a result
pub fn negotiate(
    ticket: Ticket,
    listeners: &[Arc<dyn MatchListener>],
    remote: Option<&RemoteFrame>,
) -> Negotiation {
    let mut change = MatchChange::new(&ticket.matched);
    for listener in listeners {
        listener.on_match_change(&mut change);
    }

    let work = if change.is_canceled() {
        debug!(key = %ticket.matched.key, "match change cancelled by listener");
        future::ready(None).boxed()
    } else if change.provided_count() > 0 {
        first_matched(change.into_provided()).boxed()
    } else if let Some(remote) = remote {
        remote.drive(ticket.matched.text.clone())
    } else {
        future::ready(None).boxed()
    };

    Negotiation {
        ticket,
        token: CancellationToken::new(),
        work,
    }
}

async fn first_matched(
    provided: Vec<BoxFuture<'static, Option<ProviderResult>>>,
) -> Option<SurfaceRef> {
    join_all(provided)
        .await
        .into_iter()
        .flatten()
        .find(|result| result.matched)
        .map(|result| result.fragment)
}
