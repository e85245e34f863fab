//! In-memory revocation store using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::TimeDelta;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use revokit_core::config::cache::MemoryCacheConfig;
use revokit_core::result::AppResult;
use revokit_core::traits::RevocationStore;

/// Per-entry expiry: each marker lives for the TTL stored as its value.
struct MarkerExpiry;

impl Expiry<String, Duration> for MarkerExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Duration,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(*value)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Duration,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(*value)
    }
}

/// In-process revocation store.
///
/// Markers are only visible to the process that wrote them; use the Redis
/// backend when several processes share one revocation set.
#[derive(Debug, Clone)]
pub struct MemoryRevocationStore {
    /// Revoked keys mapped to the TTL they were inserted with.
    cache: Cache<String, Duration>,
}

impl MemoryRevocationStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(MarkerExpiry)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }

    async fn set_with_ttl(&self, key: &str, ttl: TimeDelta) -> AppResult<()> {
        let Ok(ttl) = ttl.to_std() else {
            debug!(key, "Skipping revocation marker with negative TTL");
            return Ok(());
        };
        if ttl.is_zero() {
            debug!(key, "Skipping revocation marker with zero TTL");
            return Ok(());
        }

        self.cache.insert(key.to_string(), ttl).await;
        debug!(key, ttl_secs = ttl.as_secs(), "Revocation marker stored");
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.cache.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> MemoryRevocationStore {
        MemoryRevocationStore::new(&MemoryCacheConfig { max_capacity: 1000 })
    }

    #[tokio::test]
    async fn test_set_and_exists() {
        let store = make_store();
        assert!(!store.exists("token:1").await.unwrap());
        store
            .set_with_ttl("token:1", TimeDelta::seconds(60))
            .await
            .unwrap();
        assert!(store.exists("token:1").await.unwrap());
        assert!(!store.exists("token:2").await.unwrap());
    }

    #[tokio::test]
    async fn test_non_positive_ttl_is_noop() {
        let store = make_store();
        store.set_with_ttl("token:zero", TimeDelta::zero()).await.unwrap();
        store
            .set_with_ttl("token:neg", TimeDelta::seconds(-30))
            .await
            .unwrap();
        assert!(!store.exists("token:zero").await.unwrap());
        assert!(!store.exists("token:neg").await.unwrap());
    }

    #[tokio::test]
    async fn test_marker_expires_after_ttl() {
        let store = make_store();
        store
            .set_with_ttl("token:short", TimeDelta::milliseconds(200))
            .await
            .unwrap();
        assert!(store.exists("token:short").await.unwrap());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!store.exists("token:short").await.unwrap());
    }

    #[tokio::test]
    async fn test_repeated_insert_is_idempotent() {
        let store = make_store();
        for _ in 0..3 {
            store
                .set_with_ttl("token:again", TimeDelta::seconds(60))
                .await
                .unwrap();
        }
        assert!(store.exists("token:again").await.unwrap());
    }

    #[tokio::test]
    async fn test_close_clears_markers() {
        let store = make_store();
        store
            .set_with_ttl("token:c", TimeDelta::seconds(60))
            .await
            .unwrap();
        store.close().await.unwrap();
        assert!(!store.exists("token:c").await.unwrap());
    }
}
