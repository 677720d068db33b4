//! Ordered API credentials with a wrapping active index.

use crate::core::error::DomainError;
use std::fmt;
use std::sync::Mutex;

/// Ordered, non-empty list of API keys plus the index of the active one.
///
/// Shared between the LLM gateway (which reads [`active`](Self::active) on
/// every request) and the orchestrator (which calls [`rotate`](Self::rotate)
/// on retryable failures). The index lives behind a mutex so concurrent
/// turns never observe a torn rotation.
pub struct CredentialPool {
    keys: Vec<String>,
    index: Mutex<usize>,
}

impl CredentialPool {
    /// Build a pool. Blank keys are discarded and duplicates collapsed,
    /// keeping first-seen order.
    pub fn new(keys: Vec<String>) -> Result<Self, DomainError> {
        let mut unique: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.trim().to_string();
            if !key.is_empty() && !unique.contains(&key) {
                unique.push(key);
            }
        }
        if unique.is_empty() {
            return Err(DomainError::EmptyCredentialPool);
        }
        Ok(Self {
            keys: unique,
            index: Mutex::new(0),
        })
    }

    pub fn single(key: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(vec![key.into()])
    }

    fn current(&self) -> usize {
        // A poisoned lock still holds a valid index.
        *self.index.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The credential currently in use.
    pub fn active(&self) -> String {
        self.keys[self.current() % self.keys.len()].clone()
    }

    /// Advance to the next credential, wrapping at the end.
    ///
    /// Returns `false` without changing anything when the pool holds a
    /// single credential.
    pub fn rotate(&self) -> bool {
        if self.keys.len() <= 1 {
            return false;
        }
        let mut index = self.index.lock().unwrap_or_else(|e| e.into_inner());
        *index = (*index + 1) % self.keys.len();
        true
    }

    pub fn index(&self) -> usize {
        self.current()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("len", &self.keys.len())
            .field("index", &self.current())
            .finish()
    }
}
