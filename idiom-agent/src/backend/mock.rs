//! Mock generator backend for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use idiom_core::IdiomRecord;

use super::traits::{GenerateError, IdiomGenerator};
use crate::languages::Language;

/// Scriptable backend for unit tests.
///
/// Scripted outcomes are consumed front-to-back; once the script is empty
/// the fallback record (if any) is returned, otherwise every call fails
/// with [`GenerateError::EmptyResponse`].
pub struct MockGenerator {
    script: Mutex<VecDeque<Result<IdiomRecord, GenerateError>>>,
    fallback: Option<IdiomRecord>,
    probe_ok: AtomicBool,
    call_count: AtomicU32,
}

impl MockGenerator {
    /// Create a mock with an empty script (every call fails).
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            probe_ok: AtomicBool::new(true),
            call_count: AtomicU32::new(0),
        }
    }

    /// Create a mock that always returns clones of the given record.
    pub fn returning(record: IdiomRecord) -> Self {
        Self {
            fallback: Some(record),
            ..Self::new()
        }
    }

    /// Enqueue one scripted outcome.
    pub fn push(self, outcome: Result<IdiomRecord, GenerateError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    /// Make `probe` fail with an auth error.
    pub fn with_probe_failure(self) -> Self {
        self.probe_ok.store(false, Ordering::SeqCst);
        self
    }

    /// Number of times `generate` was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdiomGenerator for MockGenerator {
    fn id(&self) -> &str {
        "mock-generator"
    }

    async fn generate(&self, _language: &Language) -> Result<IdiomRecord, GenerateError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(outcome) = self.script.lock().unwrap().pop_front() {
            return outcome;
        }
        match &self.fallback {
            Some(record) => Ok(record.clone()),
            None => Err(GenerateError::EmptyResponse),
        }
    }

    async fn probe(&self) -> Result<(), GenerateError> {
        if self.probe_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GenerateError::Auth { status: 403 })
        }
    }
}
