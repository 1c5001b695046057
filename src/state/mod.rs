//! Application state and its domain collections.
//!
//! [`AppState`] is an immutable aggregate of independently typed
//! collections. A transition never edits a collection in place; it builds a
//! new snapshot that shares every untouched collection with the previous one.
//! The reducers in [`operations`] build those new collections.

mod app;
pub mod operations;

pub use app::{
    AgentCategories, AppState, Assets, Cart, Collection, CostRates, KnowledgeDocuments, Leadership,
    Opportunities, PosProducts, Pricing, Providers, Settings, Students, Theme, COLLECTION_NAMES,
};
