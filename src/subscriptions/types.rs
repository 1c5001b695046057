//! Subscription types for store change notifications.

use crate::error::StoreError;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

use super::manager::SubscriptionManager;

/// Callback invoked once per committed transition.
///
/// Listeners take no arguments; they read the fresh snapshot from the store.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Events delivered to a [`ChangeStream`].
#[derive(Clone, Debug)]
pub enum StoreEvent {
    /// A transition was committed.
    Changed {
        version: u64,
        snapshot: Arc<AppState>,
    },

    /// The stream was dropped by the store.
    Dropped { reason: DropReason },
}

/// Why a change stream was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver went away.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Registration guard returned by `Store::subscribe`.
///
/// Dropping the guard removes the registration. It only holds a weak
/// reference to the registry, so it may outlive the store.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriberId,
    registry: Weak<SubscriptionManager>,
    detached: bool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, registry: Weak<SubscriptionManager>) -> Self {
        Self {
            id,
            registry,
            detached: false,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Remove exactly this registration.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    /// Keep the listener registered for as long as the store lives.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("detached", &self.detached)
            .finish()
    }
}

/// Bounded channel of [`StoreEvent`]s for consumers on other threads.
pub struct ChangeStream {
    id: SubscriberId,
    receiver: crossbeam_channel::Receiver<StoreEvent>,
    registry: Weak<SubscriptionManager>,
}

impl ChangeStream {
    pub(crate) fn new(
        id: SubscriberId,
        receiver: crossbeam_channel::Receiver<StoreEvent>,
        registry: Weak<SubscriptionManager>,
    ) -> Self {
        Self {
            id,
            receiver,
            registry,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Block until the next committed change.
    ///
    /// Fails with [`StoreError::SubscriptionDropped`] once the store has
    /// dropped this stream or has itself gone away.
    pub fn next_change(&self) -> crate::error::Result<(u64, Arc<AppState>)> {
        match self.receiver.recv() {
            Ok(StoreEvent::Changed { version, snapshot }) => Ok((version, snapshot)),
            Ok(StoreEvent::Dropped { .. }) | Err(_) => Err(StoreError::SubscriptionDropped),
        }
    }
}

impl Drop for ChangeStream {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.close_stream(self.id);
        }
    }
}
