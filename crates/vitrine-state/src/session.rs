//! # Session Slots
//!
//! Locally-cached session-scoped state (cart, authenticated customer) kept
//! consistent across tabs without a push channel.
//!
//! ## Slot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SessionSlot Lifecycle                              │
//! │                                                                         │
//! │  spawn (mount)                                                          │
//! │    │  is_loading=true ──► source.fetch() ──► value / None on failure    │
//! │    │  is_loading=false, is_initialized=true                             │
//! │    ▼                                                                    │
//! │  run loop ◄──────────────────────────────┐                              │
//! │    │                                     │                              │
//! │    ├── invalidation event ──► dispatch background refresh (gen N)      │
//! │    │                          NO loading-flag churn: silent refresh    │
//! │    │                                     │                              │
//! │    ├── refresh settles (gen K) ──► K == newest dispatched?             │
//! │    │         yes: replace value          no: discard as stale ─────────┘│
//! │    │                                                                    │
//! │    └── shutdown / handle drop ──► exit: subscription deregistered,     │
//! │                                   late settlements land in a closed    │
//! │                                   channel and are ignored              │
//! │                                                                         │
//! │  INVARIANT: is_initialized=true ⟺ at least one fetch attempt settled   │
//! │  INVARIANT: value=None is a valid terminal state ("no session"),       │
//! │             distinct from not-yet-fetched (is_initialized=false)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Refresh Fencing
//! Concurrent invalidations may overlap their fetches. A settling refresh is
//! applied only if it is the newest one dispatched; older settlements are
//! discarded. This makes the winner the last-*dispatched* refresh rather
//! than the last one to happen to resolve, so stale data can never overwrite
//! fresher data.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::StateResult;
use crate::invalidation::{InvalidationBus, InvalidationReceiver, TabId};

/// Buffer for refresh settlements. Refreshes are rare (one per cross-tab
/// write), so a small buffer suffices.
const SETTLEMENT_BUFFER: usize = 8;

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only view of one session slot.
#[derive(Debug, Clone)]
pub struct SessionSnapshot<T> {
    /// The cached value. `None` means "no cart" / "not logged in" once
    /// `is_initialized` is true; before that it means "not yet fetched".
    pub value: Option<T>,

    /// True only during the initial mount fetch. Invalidation refreshes are
    /// silent and never set this.
    pub is_loading: bool,

    /// True once at least one fetch attempt has settled (success or
    /// failure).
    pub is_initialized: bool,
}

impl<T> Default for SessionSnapshot<T> {
    fn default() -> Self {
        SessionSnapshot {
            value: None,
            is_loading: false,
            is_initialized: false,
        }
    }
}

// =============================================================================
// Source Trait
// =============================================================================

/// The opaque async accessor a slot wraps (`fetchCart` / `fetchCustomer`
/// style).
///
/// `Ok(None)` is a valid answer meaning "no session". An `Err` is degraded
/// to `None` by the slot: fetch failures collapse to "no session", they
/// never propagate as a crash.
#[async_trait]
pub trait SessionSource: Send + Sync + 'static {
    /// The session value this source produces.
    type Value: Clone + Send + Sync + 'static;

    /// Label used in logs ("cart", "customer").
    fn kind(&self) -> &'static str {
        "session"
    }

    /// Fetches the current value from the backend.
    async fn fetch(&self) -> StateResult<Option<Self::Value>>;
}

// =============================================================================
// Slot Handles & Aliases
// =============================================================================

/// Handle to a running session slot.
///
/// Dropping the handle stops the slot's task, which deregisters its bus
/// subscription.
#[derive(Debug)]
pub struct SessionSlotHandle<T> {
    snapshot: Arc<RwLock<SessionSnapshot<T>>>,
    shutdown_tx: mpsc::Sender<()>,
}

impl<T: Clone> SessionSlotHandle<T> {
    /// Returns the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot<T> {
        self.snapshot
            .read()
            .expect("Session snapshot lock poisoned")
            .clone()
    }

    /// Convenience accessor for the cached value.
    pub fn value(&self) -> Option<T> {
        self.snapshot().value
    }

    /// True once the mount fetch has settled.
    pub fn is_initialized(&self) -> bool {
        self.snapshot().is_initialized
    }

    /// Signals the slot to shut down gracefully.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// The production cart slot.
pub type CartSlot = SessionSlotHandle<vitrine_core::Cart>;

/// The production customer slot.
pub type CustomerSlot = SessionSlotHandle<vitrine_core::Customer>;

// =============================================================================
// Slot
// =============================================================================

/// One session slot: an async accessor plus cross-tab invalidation refresh.
pub struct SessionSlot<S: SessionSource> {
    source: Arc<S>,
    snapshot: Arc<RwLock<SessionSnapshot<S::Value>>>,
    invalidations: InvalidationReceiver,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<S: SessionSource> SessionSlot<S> {
    /// Spawns a slot subscribed to `bus` on behalf of `tab` and returns its
    /// handle. The mount fetch starts immediately.
    pub fn spawn(source: S, bus: &InvalidationBus, tab: TabId) -> SessionSlotHandle<S::Value> {
        let snapshot = Arc::new(RwLock::new(SessionSnapshot::default()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let slot = SessionSlot {
            source: Arc::new(source),
            snapshot: snapshot.clone(),
            invalidations: bus.subscribe(tab),
            shutdown_rx,
        };

        tokio::spawn(slot.run());

        SessionSlotHandle {
            snapshot,
            shutdown_tx,
        }
    }

    /// Runs the slot loop. Exits on shutdown, handle drop, or bus close.
    async fn run(mut self) {
        let kind = self.source.kind();
        debug!(kind, "Session slot starting");

        // Mount: the one and only visible loading state.
        self.write(|s| s.is_loading = true);
        let value = degrade(kind, self.source.fetch().await);
        self.write(|s| {
            s.value = value;
            s.is_loading = false;
            s.is_initialized = true;
        });
        debug!(kind, "Session slot initialized");

        // Settlements from background refreshes, tagged with their
        // dispatch generation.
        let (settled_tx, mut settled_rx) =
            mpsc::channel::<(u64, Option<S::Value>)>(SETTLEMENT_BUFFER);
        let mut dispatched: u64 = 0;

        loop {
            tokio::select! {
                event = self.invalidations.changed() => match event {
                    Ok(event) => {
                        dispatched += 1;
                        let generation = dispatched;
                        debug!(kind, origin = %event.origin, generation, "Invalidation received, refreshing");

                        let source = self.source.clone();
                        let tx = settled_tx.clone();
                        tokio::spawn(async move {
                            let value = degrade(source.kind(), source.fetch().await);
                            // The slot may have unmounted while this fetch
                            // was in flight; a closed channel is fine.
                            let _ = tx.send((generation, value)).await;
                        });
                    }
                    Err(_) => {
                        debug!(kind, "Invalidation bus closed, stopping slot");
                        break;
                    }
                },

                Some((generation, value)) = settled_rx.recv() => {
                    if generation == dispatched {
                        self.write(|s| s.value = value);
                        debug!(kind, generation, "Applied refresh");
                    } else {
                        debug!(
                            kind,
                            generation,
                            newest = dispatched,
                            "Discarded stale refresh settlement"
                        );
                    }
                }

                // Explicit shutdown, or all handles dropped.
                _ = self.shutdown_rx.recv() => {
                    debug!(kind, "Session slot shutting down");
                    break;
                }
            }
        }

        debug!(kind, "Session slot stopped");
    }

    fn write<F: FnOnce(&mut SessionSnapshot<S::Value>)>(&self, f: F) {
        let mut snapshot = self
            .snapshot
            .write()
            .expect("Session snapshot lock poisoned");
        f(&mut snapshot);
    }
}

/// Collapses a fetch failure into "no session".
fn degrade<V>(kind: &str, result: StateResult<Option<V>>) -> Option<V> {
    match result {
        Ok(value) => value,
        Err(error) => {
            warn!(kind, %error, "Session fetch failed, degrading to no session");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::error::StateError;

    /// Source that replays a scripted sequence of fetch outcomes.
    struct ScriptedSource {
        responses: Mutex<VecDeque<StateResult<Option<String>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<StateResult<Option<String>>>) -> Self {
            ScriptedSource {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionSource for Arc<ScriptedSource> {
        type Value = String;

        fn kind(&self) -> &'static str {
            "scripted"
        }

        async fn fetch(&self) -> StateResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    /// Source whose responses each settle after a scripted virtual delay.
    struct DelayedSource {
        responses: Mutex<VecDeque<(Duration, Option<String>)>>,
    }

    #[async_trait]
    impl SessionSource for DelayedSource {
        type Value = String;

        async fn fetch(&self) -> StateResult<Option<String>> {
            let (delay, value) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, None));
            tokio::time::sleep(delay).await;
            Ok(value)
        }
    }

    async fn wait_for<T: Clone, F: Fn(&SessionSnapshot<T>) -> bool>(
        handle: &SessionSlotHandle<T>,
        pred: F,
    ) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if pred(&handle.snapshot()) {
                    return;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("condition not reached");
    }

    #[tokio::test]
    async fn test_mount_fetch_success() {
        let bus = InvalidationBus::new();
        let source = Arc::new(ScriptedSource::new(vec![Ok(Some("cart-1".into()))]));
        let handle = SessionSlot::spawn(source.clone(), &bus, TabId::new());

        wait_for(&handle, |s| s.is_initialized).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.value.as_deref(), Some("cart-1"));
        assert!(!snapshot.is_loading);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mount_fetch_failure_degrades_to_no_session() {
        let bus = InvalidationBus::new();
        let source = Arc::new(ScriptedSource::new(vec![Err(StateError::Fetch(
            "backend down".into(),
        ))]));
        let handle = SessionSlot::spawn(source, &bus, TabId::new());

        wait_for(&handle, |s| s.is_initialized).await;

        // Initialized even though the fetch rejected.
        let snapshot = handle.snapshot();
        assert!(snapshot.is_initialized);
        assert!(snapshot.value.is_none());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_invalidation_triggers_silent_refresh() {
        let bus = InvalidationBus::new();
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(Some("v1".into())),
            Ok(Some("v2".into())),
        ]));
        let handle = SessionSlot::spawn(source.clone(), &bus, TabId::new());

        wait_for(&handle, |s| s.is_initialized).await;
        assert_eq!(handle.value().as_deref(), Some("v1"));

        bus.notify(TabId::new());

        wait_for(&handle, |s| s.value.as_deref() == Some("v2")).await;

        // The refresh never re-entered the loading state.
        assert!(!handle.snapshot().is_loading);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_degrades_existing_value() {
        let bus = InvalidationBus::new();
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(Some("v1".into())),
            Err(StateError::Fetch("flaky".into())),
        ]));
        let handle = SessionSlot::spawn(source, &bus, TabId::new());

        wait_for(&handle, |s| s.is_initialized).await;
        bus.notify(TabId::new());

        wait_for(&handle, |s| s.value.is_none()).await;
        assert!(handle.is_initialized());
    }

    #[tokio::test(start_paused = true)]
    async fn test_own_origin_invalidation_does_not_refetch() {
        let bus = InvalidationBus::new();
        let tab = TabId::new();
        let source = Arc::new(ScriptedSource::new(vec![Ok(Some("v1".into()))]));
        let handle = SessionSlot::spawn(source.clone(), &bus, tab);

        wait_for(&handle, |s| s.is_initialized).await;

        // This tab performed the write: its own slot must not re-fetch.
        bus.notify(tab);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_settlement_is_discarded() {
        let bus = InvalidationBus::new();
        let source = DelayedSource {
            responses: Mutex::new(VecDeque::from(vec![
                // Mount fetch: immediate.
                (Duration::ZERO, Some("initial".into())),
                // First invalidation: slow fetch resolving to stale data.
                (Duration::from_millis(100), Some("stale".into())),
                // Second invalidation: fast fetch with fresh data.
                (Duration::from_millis(10), Some("fresh".into())),
            ])),
        };
        let handle = SessionSlot::spawn(source, &bus, TabId::new());

        wait_for(&handle, |s| s.is_initialized).await;

        let writer = TabId::new();
        bus.notify(writer);
        bus.notify(writer);

        // Let both in-flight refreshes settle.
        tokio::time::sleep(Duration::from_millis(200)).await;

        // The slow first refresh resolved last but must NOT win: the
        // generation fence keeps the last-dispatched result.
        assert_eq!(handle.value().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_shutdown_deregisters_subscription() {
        let bus = InvalidationBus::new();
        let source = Arc::new(ScriptedSource::new(vec![Ok(None)]));
        let handle = SessionSlot::spawn(source, &bus, TabId::new());

        wait_for(&handle, |s| s.is_initialized).await;
        assert_eq!(bus.subscriber_count(), 1);

        handle.shutdown().await;

        tokio::time::timeout(Duration::from_secs(5), async {
            while bus.subscriber_count() != 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("subscription not released");
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_slot() {
        let bus = InvalidationBus::new();
        let source = Arc::new(ScriptedSource::new(vec![Ok(None)]));
        let handle = SessionSlot::spawn(source, &bus, TabId::new());

        wait_for(&handle, |s| s.is_initialized).await;
        drop(handle);

        tokio::time::timeout(Duration::from_secs(5), async {
            while bus.subscriber_count() != 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("slot task did not exit on handle drop");
    }
}
