//! Hydration gate state machine.

use crate::error::{Result, StoreError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Where a consumer stands relative to the live store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationPhase {
    /// Rendered from seed props only; no store in this context.
    Unattached,
    /// Subscribing and pulling the seeded snapshot.
    Attaching,
    /// Rendering live store data.
    Live,
}

/// Output of a render that depends on hydration.
#[derive(Clone, Debug, PartialEq)]
pub enum Rendered<T> {
    /// Deterministic skeleton shown until the consumer is live.
    Placeholder,
    Live(T),
}

impl<T> Rendered<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Rendered::Placeholder)
    }

    pub fn live(&self) -> Option<&T> {
        match self {
            Rendered::Live(value) => Some(value),
            Rendered::Placeholder => None,
        }
    }

    pub fn into_live(self) -> Option<T> {
        match self {
            Rendered::Live(value) => Some(value),
            Rendered::Placeholder => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Rendered<U> {
        match self {
            Rendered::Live(value) => Rendered::Live(f(value)),
            Rendered::Placeholder => Rendered::Placeholder,
        }
    }
}

/// One-way `Unattached -> Attaching -> Live` gate for a single consumer.
#[derive(Debug)]
pub struct HydrationGate {
    phase: Mutex<HydrationPhase>,
}

impl HydrationGate {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(HydrationPhase::Unattached),
        }
    }

    pub fn phase(&self) -> HydrationPhase {
        *self.phase.lock()
    }

    pub fn is_live(&self) -> bool {
        self.phase() == HydrationPhase::Live
    }

    /// `Unattached -> Attaching`.
    pub fn begin_attach(&self) -> Result<()> {
        self.advance(HydrationPhase::Unattached, HydrationPhase::Attaching)
    }

    /// `Attaching -> Live`.
    pub fn complete_attach(&self) -> Result<()> {
        self.advance(HydrationPhase::Attaching, HydrationPhase::Live)
    }

    /// Render live content only once the gate is open.
    ///
    /// `live` is not evaluated while the gate is closed.
    pub fn select<T>(&self, live: impl FnOnce() -> T) -> Rendered<T> {
        if self.is_live() {
            Rendered::Live(live())
        } else {
            Rendered::Placeholder
        }
    }

    fn advance(&self, from: HydrationPhase, to: HydrationPhase) -> Result<()> {
        let mut phase = self.phase.lock();
        if *phase != from {
            return Err(StoreError::InvalidHydration { from: *phase, to });
        }
        *phase = to;
        Ok(())
    }
}

impl Default for HydrationGate {
    fn default() -> Self {
        Self::new()
    }
}
