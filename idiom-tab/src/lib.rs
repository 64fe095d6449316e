//! New-tab idiom session engine.
//!
//! Wires the domain model (`idiom-core`) and the generation client
//! (`idiom-agent`) into a persistent session:
//!
//! - **Store**: async key-value persistence port with a JSON-file backend
//! - **Session**: explicit session state with load-once / persist-wholesale
//! - **Supply**: strategy trait over the static and generative variants
//! - **Selector**: the generative rotation algorithm with its busy guard
//! - **Settings**: credential save/test and cache clearing

pub mod cli;
pub mod config;
pub mod selector;
pub mod session;
pub mod settings;
pub mod store;
pub mod supply;

pub use config::Args;
pub use selector::GenerativeSupply;
pub use session::{Selection, Session, SessionState};
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreError};
pub use supply::{DatasetSupply, IdiomSupply, SupplyOutcome};
