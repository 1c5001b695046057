//! # Domain Store
//!
//! An in-process reactive store shared by every feature area of a business
//! application (asset rental, knowledge base, opportunities, staff, pricing,
//! point of sale, student records, cart, settings, theme).
//!
//! ## Core Concepts
//!
//! - **Store**: holds one immutable [`AppState`] snapshot, replaced only by
//!   whole-state transitions, with synchronous change notification
//! - **Collections**: named slices of the snapshot, each behind its own `Arc`
//! - **Hooks**: per-collection readers and setters that re-render only when
//!   their own collection is replaced
//! - **Hydration**: a one-way gate between placeholder and live rendering
//! - **Bootstrap**: validated seeding from external sources
//!
//! ## Example
//!
//! ```ignore
//! use domain_store::{Assets, Asset, Bootstrap, DomainHook, Scope, StaticSeed, StoreConfig};
//!
//! let store = Bootstrap::new("/admin/assets")
//!     .source(StaticSeed::from_json_str(r#"{ "assets": [] }"#)?)
//!     .into_store(StoreConfig::default())?;
//!
//! let mut assets = DomainHook::<Assets>::new(|| println!("re-render"));
//! assets.activate(&Scope::Client(store.clone()))?;
//!
//! assets.setter().prepend(Asset::new("a1", "Drill", 50.0))?;
//! ```

pub mod bootstrap;
pub mod error;
pub mod hooks;
pub mod hydration;
pub mod state;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use bootstrap::{state_from_seed, Bootstrap, Seed, SeedSource, StaticSeed};
pub use error::{Result, StoreError};
pub use hooks::{CollectionReader, CollectionSetter, DomainHook, Scope};
pub use hydration::{HydrationGate, HydrationPhase, Rendered};
pub use state::{
    operations, AgentCategories, AppState, Assets, Cart, Collection, CostRates,
    KnowledgeDocuments, Leadership, Opportunities, PosProducts, Pricing, Providers, Settings,
    Students, Theme, COLLECTION_NAMES,
};
pub use store::{Commit, Store, StoreConfig, StoreStats, WeakStore};
pub use subscriptions::{
    ChangeStream, DropReason, Listener, StoreEvent, SubscriberId, Subscription,
    SubscriptionManager,
};
pub use types::*;
