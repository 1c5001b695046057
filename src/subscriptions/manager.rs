//! Subscription registry and notification passes.

use crate::state::AppState;
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{trace, warn};

use super::types::{DropReason, Listener, StoreEvent, SubscriberId};

/// A registered listener.
struct Registration {
    id: SubscriberId,
    listener: Listener,
    /// Cleared on unsubscribe so an in-flight pass skips it.
    active: AtomicBool,
}

/// Manages listeners and change streams.
pub struct SubscriptionManager {
    /// Listeners in registration order.
    listeners: RwLock<Vec<Arc<Registration>>>,
    /// Channel-backed change streams by ID.
    streams: RwLock<HashMap<SubscriberId, Sender<StoreEvent>>>,
    /// Counter for generating subscriber IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            streams: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> SubscriberId {
        SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a listener at the end of the notification order.
    pub fn register(&self, listener: Listener) -> SubscriberId {
        let id = self.allocate_id();
        let registration = Arc::new(Registration {
            id,
            listener,
            active: AtomicBool::new(true),
        });

        self.listeners.write().push(registration);
        trace!(subscriber = id.0, "Listener registered");
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.iter().position(|r| r.id == id) {
            Some(index) => {
                let registration = listeners.remove(index);
                registration.active.store(false, Ordering::SeqCst);
                trace!(subscriber = id.0, "Listener unregistered");
                true
            }
            None => false,
        }
    }

    /// Invoke every registered listener, in registration order.
    ///
    /// Iterates over a copy of the registry taken up front: listeners added
    /// during the pass wait for the next one, listeners removed during the
    /// pass are skipped.
    pub fn notify(&self) {
        let pass: Vec<Arc<Registration>> = self.listeners.read().clone();

        for registration in pass {
            if registration.active.load(Ordering::SeqCst) {
                (registration.listener)();
            }
        }
    }

    /// Get listener count.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    // --- Change Streams ---

    /// Open a bounded change stream.
    pub fn open_stream(&self, buffer_size: usize) -> (SubscriberId, Receiver<StoreEvent>) {
        let id = self.allocate_id();
        let (sender, receiver) = bounded(buffer_size.max(1));
        self.streams.write().insert(id, sender);
        trace!(subscriber = id.0, buffer_size, "Change stream opened");
        (id, receiver)
    }

    /// Close a change stream.
    pub fn close_stream(&self, id: SubscriberId) {
        if let Some(sender) = self.streams.write().remove(&id) {
            // Best effort, the receiver may already be gone.
            let _ = sender.try_send(StoreEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get change stream count.
    pub fn stream_count(&self) -> usize {
        self.streams.read().len()
    }

    /// Send a committed snapshot to every stream. Drops streams that fail to receive.
    pub fn broadcast(&self, version: u64, snapshot: &Arc<AppState>) {
        let mut to_remove = Vec::new();

        {
            let streams = self.streams.read();
            for (id, sender) in streams.iter() {
                let event = StoreEvent::Changed {
                    version,
                    snapshot: Arc::clone(snapshot),
                };
                match sender.try_send(event) {
                    Ok(()) => {}
                    Err(crossbeam_channel::TrySendError::Full(_)) => {
                        to_remove.push((*id, DropReason::BufferOverflow))
                    }
                    Err(crossbeam_channel::TrySendError::Disconnected(_)) => {
                        to_remove.push((*id, DropReason::Disconnected))
                    }
                }
            }
        }

        if !to_remove.is_empty() {
            let mut streams = self.streams.write();
            for (id, reason) in to_remove {
                if let Some(sender) = streams.remove(&id) {
                    warn!(subscriber = id.0, ?reason, "Dropping change stream");
                    let _ = sender.try_send(StoreEvent::Dropped { reason });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
