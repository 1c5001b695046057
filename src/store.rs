//! Main Store struct holding the current snapshot.

use crate::error::{Result, StoreError};
use crate::state::AppState;
use crate::subscriptions::{ChangeStream, Subscription, SubscriptionManager};
use parking_lot::{ReentrantMutex, RwLock};
use serde::Deserialize;
use std::cell::Cell;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Store configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name reported in log events.
    pub label: String,

    /// Notification passes slower than this are logged as warnings.
    pub slow_notify_threshold_ms: u64,

    /// Capacity of each change stream before it is dropped.
    pub stream_buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            label: "app".to_string(),
            slow_notify_threshold_ms: 16,
            stream_buffer_size: 64,
        }
    }
}

impl StoreConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn slow_notify_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_notify_threshold_ms)
    }
}

/// Outcome of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commit {
    /// The snapshot was replaced and subscribers were notified.
    Changed { version: u64 },
    /// The transition returned the current snapshot; nothing happened.
    Unchanged,
}

impl Commit {
    pub fn is_changed(&self) -> bool {
        matches!(self, Commit::Changed { .. })
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default)]
pub struct StoreStats {
    pub version: u64,
    pub listener_count: usize,
    pub stream_count: usize,
}

/// The current snapshot with its version, replaced as one unit.
struct Head {
    version: u64,
    state: Arc<AppState>,
}

struct StoreInner {
    config: StoreConfig,

    head: RwLock<Head>,

    subscriptions: Arc<SubscriptionManager>,

    /// Serializes writers. The flag is set while a transition or its
    /// notification pass runs, so same-thread reentry can be refused.
    write_lock: ReentrantMutex<Cell<bool>>,
}

/// The reactive domain store.
///
/// Holds a single [`AppState`] snapshot, replaces it through transitions and
/// notifies subscribers after each committed change. `Store` is a cheap
/// handle: clones share the same state. Create one per application (or per
/// test) and pass it to consumers explicitly.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

/// Weak handle to a [`Store`], used by listeners that must not keep it alive.
#[derive(Clone)]
pub struct WeakStore {
    inner: Weak<StoreInner>,
}

impl WeakStore {
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

/// Clears the in-transition flag, also when the transition panics.
struct TransitionFlag<'a>(&'a Cell<bool>);

impl Drop for TransitionFlag<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Store {
    /// Create a store seeded with `seed`.
    pub fn new(seed: AppState, config: StoreConfig) -> Self {
        debug!(store = %config.label, "Store created");
        Self {
            inner: Arc::new(StoreInner {
                config,
                head: RwLock::new(Head {
                    version: 0,
                    state: Arc::new(seed),
                }),
                subscriptions: Arc::new(SubscriptionManager::new()),
                write_lock: ReentrantMutex::new(Cell::new(false)),
            }),
        }
    }

    /// Create a store with the default configuration.
    pub fn from_seed(seed: AppState) -> Self {
        Self::new(seed, StoreConfig::default())
    }

    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    // --- Reading ---

    /// Current snapshot. Treat it as read-only.
    pub fn get(&self) -> Arc<AppState> {
        Arc::clone(&self.inner.head.read().state)
    }

    /// Number of committed transitions since the store was created.
    pub fn version(&self) -> u64 {
        self.inner.head.read().version
    }

    // --- Writing ---

    /// Apply a transition to the current snapshot.
    ///
    /// The transition receives the immediately preceding snapshot. Returning
    /// that same `Arc` commits nothing and notifies nobody.
    pub fn set<F>(&self, transition: F) -> Result<Commit>
    where
        F: FnOnce(&Arc<AppState>) -> Arc<AppState>,
    {
        self.try_set(|prev| Ok::<_, StoreError>(transition(prev)))
    }

    /// Apply a fallible transition.
    ///
    /// On `Err` the snapshot is left unchanged, no notification fires, and
    /// the error is returned as-is. A panicking transition likewise leaves
    /// the snapshot untouched.
    pub fn try_set<F, E>(&self, transition: F) -> std::result::Result<Commit, E>
    where
        F: FnOnce(&Arc<AppState>) -> std::result::Result<Arc<AppState>, E>,
        E: From<StoreError>,
    {
        let guard = self.inner.write_lock.lock();
        if guard.get() {
            return Err(StoreError::ReentrantTransition.into());
        }
        guard.set(true);
        let _flag = TransitionFlag(&*guard);

        let prev = self.get();
        let next = transition(&prev)?;

        if Arc::ptr_eq(&prev, &next) {
            trace!(store = %self.inner.config.label, "Transition left state unchanged");
            return Ok(Commit::Unchanged);
        }

        let version = {
            let mut head = self.inner.head.write();
            head.version += 1;
            head.state = Arc::clone(&next);
            head.version
        };

        let subscriptions = &self.inner.subscriptions;
        debug!(
            store = %self.inner.config.label,
            version,
            listeners = subscriptions.listener_count(),
            "Transition committed"
        );

        let started = Instant::now();
        subscriptions.notify();
        subscriptions.broadcast(version, &next);

        let elapsed = started.elapsed();
        if elapsed > self.inner.config.slow_notify_threshold() {
            warn!(
                store = %self.inner.config.label,
                version,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow notification pass"
            );
        }

        Ok(Commit::Changed { version })
    }

    // --- Subscriptions ---

    /// Register a listener, invoked after every committed transition.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.subscriptions.register(Arc::new(callback));
        Subscription::new(id, Arc::downgrade(&self.inner.subscriptions))
    }

    /// Open a change stream with the configured buffer size.
    pub fn stream(&self) -> ChangeStream {
        self.stream_with_capacity(self.inner.config.stream_buffer_size)
    }

    /// Open a change stream holding at most `capacity` undelivered events.
    pub fn stream_with_capacity(&self, capacity: usize) -> ChangeStream {
        let (id, receiver) = self.inner.subscriptions.open_stream(capacity);
        ChangeStream::new(id, receiver, Arc::downgrade(&self.inner.subscriptions))
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            version: self.version(),
            listener_count: self.inner.subscriptions.listener_count(),
            stream_count: self.inner.subscriptions.stream_count(),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("label", &self.inner.config.label)
            .field("version", &self.version())
            .finish()
    }
}
