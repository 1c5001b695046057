//! Bootstrap: seeding the store on first page load.
//!
//! Backing sources are external collaborators. Each supplies a partial
//! [`Seed`]; the [`Bootstrap`] loader merges them and enforces the complete
//! shape at this boundary, since the store itself performs no validation.

mod loader;

pub use loader::{state_from_seed, Bootstrap, Seed, SeedSource, StaticSeed};
