//! Caller-supplied hooks invoked during the token lifecycle.

use async_trait::async_trait;
use chrono::TimeDelta;

use crate::error::TokenResult;
use crate::jwt::Claims;

use super::context::AuthContext;

/// Shapes claims before they are signed.
///
/// Runs on issue and again on refresh. May edit the claims, abort with an
/// error, or return a refresh lifetime in seconds; only a positive value
/// replaces the configured one.
#[async_trait]
pub trait ClaimsHook: Send + Sync {
    /// Inspects or edits `claims`.
    async fn shape(&self, ctx: &AuthContext, claims: &mut Claims) -> TokenResult<i64>;
}

#[async_trait]
impl<F> ClaimsHook for F
where
    F: Fn(&AuthContext, &mut Claims) -> TokenResult<i64> + Send + Sync,
{
    async fn shape(&self, ctx: &AuthContext, claims: &mut Claims) -> TokenResult<i64> {
        (self)(ctx, claims)
    }
}

/// Synchronises external state with the token manager on demand.
#[async_trait]
pub trait UpdateHook: Send + Sync {
    /// Performs the update.
    async fn update(&self, ctx: &AuthContext) -> TokenResult<()>;
}

#[async_trait]
impl<F> UpdateHook for F
where
    F: Fn(&AuthContext) -> TokenResult<()> + Send + Sync,
{
    async fn update(&self, ctx: &AuthContext) -> TokenResult<()> {
        (self)(ctx)
    }
}

/// Per-call gate on refresh, e.g. rate limits or session policy.
///
/// Receives the parsed claims and the configured refresh lifetime; an
/// error aborts the refresh and is returned unchanged.
#[async_trait]
pub trait RefreshCheck: Send + Sync {
    /// Approves or rejects the refresh.
    async fn check(&self, claims: &Claims, refresh_ttl: TimeDelta) -> TokenResult<()>;
}

#[async_trait]
impl<F> RefreshCheck for F
where
    F: Fn(&Claims, TimeDelta) -> TokenResult<()> + Send + Sync,
{
    async fn check(&self, claims: &Claims, refresh_ttl: TimeDelta) -> TokenResult<()> {
        (self)(claims, refresh_ttl)
    }
}
