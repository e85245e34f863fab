//! Shared helpers for token lifecycle tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use revokit_auth::TokenManager;
use revokit_auth::token::PolicyOverride;
use revokit_auth::token::policy::{with_clock, with_signing_secret};
use revokit_cache::memory::MemoryRevocationStore;
use revokit_core::config::cache::MemoryCacheConfig;
use revokit_core::error::AppError;
use revokit_core::result::AppResult;
use revokit_core::traits::{Clock, RevocationStore};

/// Secret shared by test managers.
pub const SECRET: &str = "lifecycle-test-secret";

/// Clock whose time only moves when the test says so.
#[derive(Debug, Clone)]
pub struct ManualClock {
    secs: Arc<AtomicI64>,
}

impl ManualClock {
    /// Starts at the current wall-clock second.
    pub fn new() -> Self {
        Self {
            secs: Arc::new(AtomicI64::new(Utc::now().timestamp())),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: TimeDelta) {
        self.secs.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }

    /// Current second.
    pub fn secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs(), 0).expect("timestamp in range")
    }
}

/// Store whose every call fails.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl RevocationStore for FailingStore {
    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }

    async fn set_with_ttl(&self, _key: &str, _ttl: TimeDelta) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn close(&self) -> AppResult<()> {
        Ok(())
    }
}

/// In-memory store.
pub fn memory_store() -> Arc<dyn RevocationStore> {
    Arc::new(MemoryRevocationStore::new(&MemoryCacheConfig::default()))
}

/// Manager over an in-memory store with a fixed secret and manual clock.
pub fn manager_with(
    clock: &ManualClock,
    extra: impl IntoIterator<Item = PolicyOverride>,
) -> TokenManager {
    manager_over(memory_store(), clock, extra)
}

/// Manager over `store` with a fixed secret and manual clock.
pub fn manager_over(
    store: Arc<dyn RevocationStore>,
    clock: &ManualClock,
    extra: impl IntoIterator<Item = PolicyOverride>,
) -> TokenManager {
    let mut overrides = vec![
        with_signing_secret(SECRET),
        with_clock(Arc::new(clock.clone())),
    ];
    overrides.extend(extra);
    TokenManager::new(store, overrides)
}
