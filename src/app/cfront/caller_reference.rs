//! Sources of `CallerReference` values.
//!
//! CloudFront uses the caller reference to deduplicate create requests, so every new distribution
//! needs a fresh one. Generation sits behind [`CallerReferenceProvider`] so the rest of the mapping
//! stays deterministic and tests can pin the value.

use uuid::Uuid;

pub trait CallerReferenceProvider: Send + Sync {
    fn next_reference(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCallerReference;

impl CallerReferenceProvider for UuidCallerReference {
    fn next_reference(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Always the same reference
#[derive(Debug, Clone)]
pub struct FixedCallerReference(String);

impl FixedCallerReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }
}

impl CallerReferenceProvider for FixedCallerReference {
    fn next_reference(&self) -> String {
        self.0.clone()
    }
}
