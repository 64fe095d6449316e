//! Generation client for the idiom supply engine.
//!
//! Obtains novel idiom records from a generative-model HTTP API behind a
//! trait-based backend abstraction:
//!
//! - [`IdiomGenerator`]: the backend trait (one generation per call, no retries)
//! - [`GeminiBackend`]: production backend for the Gemini `generateContent` API
//! - [`MockGenerator`]: scriptable backend for tests
//! - [`extract`]: the isolated JSON-span extraction and validation step
//! - [`prompt`]: natural-language prompt assembly
//! - [`languages`]: the fixed supported-language table

pub mod backend;
pub mod extract;
pub mod languages;
pub mod prompt;

// Re-export main types
pub use backend::gemini::GeminiBackend;
pub use backend::mock::MockGenerator;
pub use backend::traits::{GenerateError, IdiomGenerator};
pub use languages::{random_language, Language, SUPPORTED_LANGUAGES};
