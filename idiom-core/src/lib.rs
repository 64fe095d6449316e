//! Domain model for the idiom supply engine.
//!
//! Pure logic, no I/O: everything here is synchronous and deterministic so
//! the rotation invariants can be tested without a runtime.
//!
//! # Key Components
//!
//! - [`IdiomRecord`]: one idiom with its gloss, examples and optional notes
//! - [`Fingerprint`]: normalized identity key used for all deduplication
//! - [`RotationCache`]: capacity-bounded FIFO of previously generated idioms
//! - [`SeenSet`]: fingerprints shown since the last full-rotation reset
//! - [`Favorites`]: insertion-ordered saved idioms with record snapshots
//! - [`Dataset`]: the bundled static idiom pool

pub mod cache;
pub mod dataset;
pub mod favorites;
pub mod fingerprint;
pub mod seen;
pub mod types;

// Re-export main types
pub use cache::RotationCache;
pub use dataset::{Dataset, DatasetError};
pub use favorites::Favorites;
pub use fingerprint::Fingerprint;
pub use seen::SeenSet;
pub use types::IdiomRecord;
