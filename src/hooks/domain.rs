//! Per-consumer domain hook combining hydration, reader and setter.

use crate::error::Result;
use crate::hydration::{HydrationGate, HydrationPhase, Rendered};
use crate::state::Collection;
use crate::store::Store;
use std::sync::Arc;
use tracing::trace;

use super::reader::CollectionReader;
use super::setter::CollectionSetter;

/// The execution context a consumer renders in.
///
/// The store is injected through the scope rather than looked up globally.
#[derive(Clone, Debug)]
pub enum Scope {
    /// No store exists here (e.g. server-side rendering).
    Server,
    /// Client context with the live store.
    Client(Store),
}

impl Scope {
    pub fn store(&self) -> Option<&Store> {
        match self {
            Scope::Client(store) => Some(store),
            Scope::Server => None,
        }
    }
}

/// The `(collection, setCollection)` pair for one consumer.
///
/// Starts `Unattached` and renders a placeholder. [`activate`](Self::activate)
/// in a client scope subscribes to the store and goes live; from then on
/// [`render`](Self::render) returns live data and the consumer's
/// `rerender` callback fires whenever the collection is replaced.
pub struct DomainHook<C: Collection> {
    gate: HydrationGate,
    reader: Option<CollectionReader<C>>,
    setter: CollectionSetter<C>,
    rerender: Arc<dyn Fn() + Send + Sync>,
}

impl<C: Collection> DomainHook<C> {
    pub fn new<R>(rerender: R) -> Self
    where
        R: Fn() + Send + Sync + 'static,
    {
        Self {
            gate: HydrationGate::new(),
            reader: None,
            setter: CollectionSetter::detached(),
            rerender: Arc::new(rerender),
        }
    }

    /// Attach to the live store, once.
    ///
    /// Returns `true` if this call made the hook live. In a server scope, or
    /// once already live, nothing happens and `false` is returned.
    pub fn activate(&mut self, scope: &Scope) -> Result<bool> {
        let Some(store) = scope.store() else {
            return Ok(false);
        };
        if self.gate.phase() != HydrationPhase::Unattached {
            return Ok(false);
        }

        self.gate.begin_attach()?;

        let rerender = Arc::clone(&self.rerender);
        self.reader = Some(CollectionReader::attach(store, move |_| rerender()));
        self.setter = CollectionSetter::new(store.clone());

        self.gate.complete_attach()?;
        trace!(collection = C::NAME, "Hook attached");

        // First live render replaces the placeholder.
        (self.rerender)();
        Ok(true)
    }

    pub fn phase(&self) -> HydrationPhase {
        self.gate.phase()
    }

    /// Placeholder until live, then the current collection.
    pub fn render(&self) -> Rendered<Arc<C::Value>> {
        match &self.reader {
            Some(reader) => self.gate.select(|| reader.current()),
            None => Rendered::Placeholder,
        }
    }

    /// The mutator half. Detached until the hook is live.
    pub fn setter(&self) -> CollectionSetter<C> {
        self.setter.clone()
    }

    /// Both halves at once.
    pub fn pair(&self) -> (Rendered<Arc<C::Value>>, CollectionSetter<C>) {
        (self.render(), self.setter())
    }
}

impl<C: Collection> std::fmt::Debug for DomainHook<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainHook")
            .field("collection", &C::NAME)
            .field("phase", &self.phase())
            .finish()
    }
}
