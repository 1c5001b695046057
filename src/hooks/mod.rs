//! Hook factory: per-collection accessors built on the store.
//!
//! For any [`Collection`](crate::state::Collection) `C`:
//! - [`CollectionReader<C>`] subscribes and re-renders its consumer only
//!   when `C`'s `Arc` is replaced
//! - [`CollectionSetter<C>`] runs collection updaters as single store
//!   transitions, splicing the result into the snapshot
//! - [`DomainHook<C>`] pairs both behind a hydration gate
//!
//! # Example
//!
//! ```ignore
//! let store = Store::from_seed(seed);
//! let scope = Scope::Client(store.clone());
//!
//! let mut assets = DomainHook::<Assets>::new(|| request_repaint());
//! assets.activate(&scope)?;
//!
//! let (current, set_assets) = assets.pair();
//! set_assets.prepend(Asset::new(EntityId::generate(), "Drill", 50.0))?;
//! ```

mod domain;
mod reader;
mod setter;

pub use domain::{DomainHook, Scope};
pub use reader::CollectionReader;
pub use setter::CollectionSetter;
