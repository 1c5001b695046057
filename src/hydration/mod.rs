//! Hydration: attaching a consumer to the live store.
//!
//! A consumer first renders where no store exists (server-side, or on the
//! client before activation). In that phase it shows a placeholder instead
//! of guessing at store content. On activation it subscribes, pulls the
//! seeded snapshot and goes live. The transition happens at most once and
//! never reverts.

mod gate;

pub use gate::{HydrationGate, HydrationPhase, Rendered};
