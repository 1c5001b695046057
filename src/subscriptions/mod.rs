//! Change notification for the store.
//!
//! Two kinds of consumers are supported:
//! - Listeners: argument-less callbacks invoked synchronously, in
//!   registration order, after every committed transition
//! - Change streams: bounded channels carrying the new snapshot, with
//!   slow-consumer dropping, for consumers living on other threads
//!
//! # Example
//!
//! ```ignore
//! let store = Store::from_seed(AppState::default());
//!
//! let weak = store.downgrade();
//! let subscription = store.subscribe(move || {
//!     if let Some(store) = weak.upgrade() {
//!         println!("{} assets", store.get().get::<Assets>().len());
//!     }
//! });
//!
//! let stream = store.stream();
//! std::thread::spawn(move || {
//!     while let Ok(StoreEvent::Changed { version, .. }) = stream.recv() {
//!         println!("version {version}");
//!     }
//! });
//!
//! subscription.unsubscribe();
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{ChangeStream, DropReason, Listener, StoreEvent, SubscriberId, Subscription};
