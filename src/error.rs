//! Error types for the domain store.

use crate::hydration::HydrationPhase;
use crate::types::EntityId;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No live store is attached in this render context")]
    Detached,

    #[error("Transition started while another transition or notification pass was running on this thread")]
    ReentrantTransition,

    #[error("Invalid hydration transition: {from:?} -> {to:?}")]
    InvalidHydration {
        from: HydrationPhase,
        to: HydrationPhase,
    },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid seed for collection {collection}: {reason}")]
    InvalidSeed { collection: String, reason: String },

    #[error("Duplicate id {id} in collection {collection}")]
    DuplicateId {
        collection: &'static str,
        id: EntityId,
    },

    #[error("Entity not found in collection {collection}: {id}")]
    EntityNotFound {
        collection: &'static str,
        id: EntityId,
    },

    #[error("Edit changed the identifier of {id} in collection {collection}")]
    IdentifierChanged {
        collection: &'static str,
        id: EntityId,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Subscription was dropped")]
    SubscriptionDropped,

    #[error("Seed source error: {0}")]
    Source(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
