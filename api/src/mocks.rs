//! In-memory storage implementations for tests.
//!
//! `MemoryVault` mirrors the two-tier browser storage split with two plain
//! cells; `MemoryEviction` counts invocations so tests can assert the
//! redirect side effect happened (or did not).

use crate::storage::{CredentialVault, SessionEviction};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory credential vault.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    /// Short-lived cell (tab-scoped storage in the real client).
    access: Arc<Mutex<Option<String>>>,
    /// Durable cell (origin-scoped storage in the real client).
    refresh: Arc<Mutex<Option<String>>>,
}

impl MemoryVault {
    /// Create an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vault pre-seeded with both tokens.
    #[must_use]
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        let vault = Self::new();
        vault.set_access_token(access);
        vault.set_refresh_token(refresh);
        vault
    }

    /// `true` when neither token is held.
    ///
    /// # Panics
    ///
    /// Panics if a storage mutex is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn is_empty(&self) -> bool {
        self.access.lock().unwrap().is_none() && self.refresh.lock().unwrap().is_none()
    }
}

#[allow(clippy::unwrap_used)]
impl CredentialVault for MemoryVault {
    fn access_token(&self) -> Option<String> {
        self.access.lock().unwrap().clone()
    }

    fn set_access_token(&self, token: &str) {
        *self.access.lock().unwrap() = Some(token.to_string());
    }

    fn refresh_token(&self) -> Option<String> {
        self.refresh.lock().unwrap().clone()
    }

    fn set_refresh_token(&self, token: &str) {
        *self.refresh.lock().unwrap() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.access.lock().unwrap() = None;
        *self.refresh.lock().unwrap() = None;
    }
}

/// Eviction hook that counts how often it ran.
#[derive(Debug, Clone, Default)]
pub struct MemoryEviction {
    evictions: Arc<AtomicUsize>,
}

impl MemoryEviction {
    /// Create a hook with zero recorded evictions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of evictions observed.
    #[must_use]
    pub fn count(&self) -> usize {
        self.evictions.load(Ordering::SeqCst)
    }
}

impl SessionEviction for MemoryEviction {
    fn evict(&self) {
        self.evictions.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_round_trip_and_clear() {
        let vault = MemoryVault::with_tokens("at", "rt");
        assert_eq!(vault.access_token().as_deref(), Some("at"));
        assert_eq!(vault.refresh_token().as_deref(), Some("rt"));

        vault.clear();
        assert!(vault.is_empty());
    }

    #[test]
    fn test_eviction_counter() {
        let hook = MemoryEviction::new();
        assert_eq!(hook.count(), 0);
        hook.evict();
        hook.evict();
        assert_eq!(hook.count(), 2);
    }
}
