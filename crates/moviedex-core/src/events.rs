use moviedex_models::{Movie, ThemeMode, User};
use tokio::sync::broadcast;
use tracing::trace;

use crate::store::Namespace;

/// Published after a state mutation has been applied (and persisted, where it persists).
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    FavoritesChanged { namespace: Namespace, count: usize },
    /// The favorites view was replaced by another identity's list
    FavoritesReloaded { namespace: Namespace, count: usize },
    LastSearchedChanged(Movie),
    IdentityChanged(Option<User>),
    ThemeChanged(ThemeMode),
    RecentSearchesChanged(Vec<String>),
}

/// Fan-out of state changes to any number of subscribers.
///
/// Events are queued before the mutating call returns, so a subscriber that
/// polls right after the call observes them. Slow subscribers lag rather than
/// block the sender.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StateEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: StateEvent) {
        // No subscribers is the normal case for one-shot CLI commands.
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            trace!("No subscribers for {:?}", event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
