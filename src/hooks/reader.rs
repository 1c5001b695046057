//! Collection reader: re-renders only when its collection is replaced.

use crate::state::Collection;
use crate::store::Store;
use crate::subscriptions::Subscription;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Subscribed view of one collection.
///
/// The subscription lives as long as the reader. After every committed
/// transition the reader extracts its collection from the fresh snapshot and
/// calls `rerender` only if the collection's `Arc` differs from the one it
/// saw last.
pub struct CollectionReader<C: Collection> {
    last: Arc<Mutex<Arc<C::Value>>>,
    rerenders: Arc<AtomicU64>,
    _subscription: Subscription,
}

impl<C: Collection> CollectionReader<C> {
    pub fn attach<R>(store: &Store, rerender: R) -> Self
    where
        R: Fn(&Arc<C::Value>) + Send + Sync + 'static,
    {
        let last = Arc::new(Mutex::new(Arc::clone(store.get().get::<C>())));
        let rerenders = Arc::new(AtomicU64::new(0));

        let weak = store.downgrade();
        let seen = Arc::clone(&last);
        let counter = Arc::clone(&rerenders);
        let subscription = store.subscribe(move || {
            let Some(store) = weak.upgrade() else {
                return;
            };
            let fresh = Arc::clone(store.get().get::<C>());

            {
                let mut seen = seen.lock();
                if Arc::ptr_eq(&*seen, &fresh) {
                    return;
                }
                *seen = Arc::clone(&fresh);
            }

            counter.fetch_add(1, Ordering::SeqCst);
            rerender(&fresh);
        });

        Self {
            last,
            rerenders,
            _subscription: subscription,
        }
    }

    /// The collection as of the last notification.
    pub fn current(&self) -> Arc<C::Value> {
        Arc::clone(&*self.last.lock())
    }

    /// How many times the store triggered a re-render.
    pub fn rerender_count(&self) -> u64 {
        self.rerenders.load(Ordering::SeqCst)
    }
}

impl<C: Collection> std::fmt::Debug for CollectionReader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionReader")
            .field("collection", &C::NAME)
            .field("rerenders", &self.rerender_count())
            .finish()
    }
}
