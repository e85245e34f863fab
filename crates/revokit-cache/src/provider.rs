//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use tracing::info;

use revokit_core::config::cache::CacheConfig;
use revokit_core::error::AppError;
use revokit_core::result::AppResult;
use revokit_core::traits::RevocationStore;

/// Revocation store manager wrapping the configured backend.
#[derive(Debug, Clone)]
pub struct RevocationStoreManager {
    /// The inner store.
    inner: Arc<dyn RevocationStore>,
}

impl RevocationStoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn RevocationStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis revocation store");
                Arc::new(
                    crate::redis::RedisRevocationStore::connect(&config.redis, &config.key_prefix)
                        .await?,
                )
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory revocation store");
                Arc::new(crate::memory::MemoryRevocationStore::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown revocation store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }
}

#[async_trait]
impl RevocationStore for RevocationStoreManager {
    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn set_with_ttl(&self, key: &str, ttl: TimeDelta) -> AppResult<()> {
        self.inner.set_with_ttl(key, ttl).await
    }

    async fn close(&self) -> AppResult<()> {
        self.inner.close().await
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use revokit_core::error::ErrorKind;

    #[tokio::test]
    async fn test_memory_provider_from_config() {
        let config = CacheConfig::default();
        let manager = RevocationStoreManager::new(&config).await.unwrap();
        manager
            .set_with_ttl("token:a", TimeDelta::seconds(30))
            .await
            .unwrap();
        assert!(manager.exists("token:a").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = CacheConfig {
            provider: "memcached".to_string(),
            ..CacheConfig::default()
        };
        let err = RevocationStoreManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
