//! Revocation store trait for pluggable negative-cache backends.

use async_trait::async_trait;
use chrono::TimeDelta;

use crate::result::AppResult;

/// A TTL-bounded set of revoked token identifiers.
///
/// Only tokens whose owners explicitly logged out are recorded. The value
/// stored under a key carries no meaning; existence is the signal. Every
/// entry expires on its own once the token it marks would have expired
/// naturally, so the set never accumulates stale identifiers.
#[async_trait]
pub trait RevocationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check whether a revocation marker exists for `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Insert a revocation marker that lives for `ttl`.
    ///
    /// A non-positive `ttl` marks a token that has already expired on its
    /// own; implementations treat it as a no-op.
    async fn set_with_ttl(&self, key: &str, ttl: TimeDelta) -> AppResult<()>;

    /// Release any resources held by the store.
    async fn close(&self) -> AppResult<()>;
}
