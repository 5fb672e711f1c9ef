//! # Invalidation Bus
//!
//! Explicit broadcast primitive standing in for the browser's storage-change
//! event: a cross-tab "something changed, re-fetch" notification with
//! subscribe/unsubscribe, independent of any particular platform mechanism.
//!
//! ## Broadcast Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invalidation Fan-Out                               │
//! │                                                                         │
//! │   Tab A (writer)                                                        │
//! │   bus.notify(tab_a) ────┬──────────────┬──────────────┐                │
//! │                         ▼              ▼              ▼                 │
//! │                   Tab A recv      Tab B recv     Tab C recv             │
//! │                   (FILTERED:      (delivered)    (delivered)            │
//! │                    own origin)                                          │
//! │                                                                         │
//! │   Matches the storage event contract: the event fires in every tab      │
//! │   EXCEPT the one that performed the write. The payload carries no       │
//! │   data beyond "changed"; receivers re-fetch from the source of truth.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A slow receiver that lags behind the channel simply coalesces: missing
//! three "changed" events and catching the fourth triggers the same single
//! re-fetch.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StateError, StateResult};

/// Default bus capacity. Invalidations are tiny and coalescable, so a small
/// ring is plenty.
const DEFAULT_CAPACITY: usize = 64;

// =============================================================================
// Tab Identity
// =============================================================================

/// Identity of one logical tab/window instance.
///
/// Used to filter self-originated invalidations, mirroring the browser
/// storage event which never fires in the writing tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(Uuid);

impl TabId {
    /// Generates a fresh tab identity.
    pub fn new() -> Self {
        TabId(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        TabId::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Event
// =============================================================================

/// A single "session state may have changed" notification.
#[derive(Debug, Clone)]
pub struct InvalidationEvent {
    /// Tab that performed the write.
    pub origin: TabId,

    /// When the write happened.
    pub at: DateTime<Utc>,
}

// =============================================================================
// Bus
// =============================================================================

/// Broadcast channel for cross-tab invalidation.
///
/// Cloning the bus clones the sender side; all clones publish into the same
/// channel. Subscriptions are deregistered by dropping the receiver.
#[derive(Debug, Clone)]
pub struct InvalidationBus {
    tx: broadcast::Sender<InvalidationEvent>,
}

impl InvalidationBus {
    /// Creates a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        InvalidationBus { tx }
    }

    /// Publishes a "changed" notification on behalf of `origin`.
    ///
    /// Delivery to zero subscribers is fine (nobody is listening yet).
    pub fn notify(&self, origin: TabId) {
        let event = InvalidationEvent {
            origin,
            at: Utc::now(),
        };
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(%origin, delivered, "Published invalidation");
    }

    /// Subscribes on behalf of `tab`. Events originating from `tab` itself
    /// are filtered out by the returned receiver.
    pub fn subscribe(&self, tab: TabId) -> InvalidationReceiver {
        InvalidationReceiver {
            rx: self.tx.subscribe(),
            tab,
        }
    }

    /// Number of live subscribers (diagnostics).
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        InvalidationBus::new()
    }
}

// =============================================================================
// Receiver
// =============================================================================

/// One subscription to the invalidation bus.
///
/// Dropping the receiver deregisters the subscription.
pub struct InvalidationReceiver {
    rx: broadcast::Receiver<InvalidationEvent>,
    tab: TabId,
}

impl InvalidationReceiver {
    /// Waits for the next invalidation from *another* tab.
    ///
    /// - Own-origin events are skipped silently
    /// - Lagging behind the ring buffer coalesces: the receiver resumes at
    ///   the oldest retained event, which is sufficient for a re-fetch
    /// - A closed bus ends the subscription with
    ///   [`StateError::ChannelClosed`]
    pub async fn changed(&mut self) -> StateResult<InvalidationEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.origin == self.tab => {
                    debug!(origin = %event.origin, "Skipping own-origin invalidation");
                }
                Ok(event) => return Ok(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!(missed, "Invalidation receiver lagged, coalescing");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(StateError::ChannelClosed("invalidation bus".into()));
                }
            }
        }
    }
}
