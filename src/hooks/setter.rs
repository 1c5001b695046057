//! Collection setter: funnels collection updaters through the store.

use crate::error::{Result, StoreError};
use crate::state::{operations, Collection};
use crate::store::{Commit, Store};
use crate::types::{Entity, EntityId};
use std::marker::PhantomData;
use std::sync::Arc;

/// Mutator for one collection.
///
/// Each update runs as a single store transition that splices the new
/// collection into the snapshot and leaves every other collection's `Arc`
/// untouched. A setter without a store (server render) refuses every call
/// with [`StoreError::Detached`]. A setter with a store keeps working after
/// the consumer that created it is gone.
pub struct CollectionSetter<C: Collection> {
    store: Option<Store>,
    _collection: PhantomData<fn() -> C>,
}

impl<C: Collection> CollectionSetter<C> {
    pub fn new(store: Store) -> Self {
        Self {
            store: Some(store),
            _collection: PhantomData,
        }
    }

    /// A setter with no live store behind it.
    pub fn detached() -> Self {
        Self {
            store: None,
            _collection: PhantomData,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    /// Replace the collection with `updater(prev)`.
    ///
    /// Returning `prev` itself is a no-op: nothing is committed and no
    /// consumer is notified.
    pub fn update<F>(&self, updater: F) -> Result<Commit>
    where
        F: FnOnce(&Arc<C::Value>) -> Arc<C::Value>,
    {
        self.try_update(|prev| Ok::<_, StoreError>(updater(prev)))
    }

    /// Fallible form of [`update`](Self::update). An `Err` commits nothing.
    pub fn try_update<F, E>(&self, updater: F) -> std::result::Result<Commit, E>
    where
        F: FnOnce(&Arc<C::Value>) -> std::result::Result<Arc<C::Value>, E>,
        E: From<StoreError>,
    {
        let store = self.store.as_ref().ok_or(StoreError::Detached)?;

        store.try_set(|prev| {
            let current = prev.get::<C>();
            let next = updater(current)?;
            if Arc::ptr_eq(current, &next) {
                return Ok(Arc::clone(prev));
            }
            Ok(Arc::new(prev.with::<C>(next)))
        })
    }

    /// Overwrite the collection regardless of its current value.
    ///
    /// Only suitable for values that do not derive from the previous one
    /// (e.g. a theme loaded from disk).
    pub fn replace(&self, value: Arc<C::Value>) -> Result<Commit> {
        self.update(move |_| value)
    }

    // --- List collections ---

    /// Insert an entity first (newest-first).
    pub fn prepend<T>(&self, item: T) -> Result<Commit>
    where
        T: Entity,
        C: Collection<Value = Vec<T>>,
    {
        self.try_update(|prev| operations::prepend(prev, item))
    }

    /// Replace or prepend an entity.
    pub fn upsert<T>(&self, item: T) -> Result<Commit>
    where
        T: Entity,
        C: Collection<Value = Vec<T>>,
    {
        self.try_update(|prev| operations::upsert(prev, item))
    }

    /// Derive a new version of one entity.
    pub fn edit<T, F>(&self, id: &EntityId, edit: F) -> Result<Commit>
    where
        T: Entity,
        C: Collection<Value = Vec<T>>,
        F: FnOnce(&T) -> T,
    {
        self.try_update(|prev| operations::update_by_id(prev, id, edit))
    }

    /// Remove an entity. Unknown ids commit nothing.
    pub fn remove<T>(&self, id: &EntityId) -> Result<Commit>
    where
        T: Entity,
        C: Collection<Value = Vec<T>>,
    {
        self.update(|prev| operations::remove_by_id(prev, id))
    }
}

impl<C: Collection> Clone for CollectionSetter<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _collection: PhantomData,
        }
    }
}

impl<C: Collection> std::fmt::Debug for CollectionSetter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSetter")
            .field("collection", &C::NAME)
            .field("attached", &self.is_attached())
            .finish()
    }
}
