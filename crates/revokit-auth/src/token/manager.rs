//! Token lifecycle manager: issue, validate, refresh, revoke.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use revokit_core::keys;
use revokit_core::traits::RevocationStore;

use crate::error::{TokenError, TokenResult};
use crate::jwt::{Claims, UserInfo};
use crate::strategy::{AuthContext, RefreshCheck};

use super::info::{TokenInfo, refresh_token_for};
use super::policy::{PolicyOverride, TokenPolicy};

/// Issues, validates, refreshes and revokes session tokens.
///
/// Holds no per-session state: a token is accepted on signature and
/// expiry unless its ID has a marker in the revocation store. Cloning is
/// cheap and clones share the policy and store.
#[derive(Clone)]
pub struct TokenManager {
    /// Resolved policy.
    policy: Arc<TokenPolicy>,
    /// Negative cache of revoked token IDs.
    store: Arc<dyn RevocationStore>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("policy", &self.policy)
            .field("store", &self.store)
            .finish()
    }
}

impl TokenManager {
    /// Creates a manager whose policy is the defaults plus `overrides`.
    pub fn new(
        store: Arc<dyn RevocationStore>,
        overrides: impl IntoIterator<Item = PolicyOverride>,
    ) -> Self {
        Self::with_policy(store, TokenPolicy::resolve(overrides))
    }

    /// Creates a manager from an already resolved policy.
    pub fn with_policy(store: Arc<dyn RevocationStore>, policy: TokenPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            store,
        }
    }

    /// The resolved policy.
    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issues a new session for `user`.
    ///
    /// 1. Copy the identity into fresh claims with a new token ID
    /// 2. Stamp `iat = nbf = now`, `exp = now + access lifetime`
    /// 3. Run the claims hook, which may replace the refresh lifetime
    /// 4. Sign
    ///
    /// Never touches the revocation store.
    pub async fn issue(
        &self,
        ctx: &AuthContext,
        user: &dyn UserInfo,
    ) -> TokenResult<(TokenInfo, Claims)> {
        let now = self.policy.clock().now();

        let mut claims = Claims::new(user.identity().clone());
        claims.stamp(now, self.policy.access_ttl());

        let refresh_ttl = self.shape_claims(ctx, &mut claims).await?;
        let access_token = self.sign(ctx, &claims)?;

        info!(
            token_id = %claims.jti,
            sub = %claims.identity.sub,
            expires_at = claims.exp,
            "Token issued"
        );
        Ok((self.token_info(&claims, access_token, now, refresh_ttl), claims))
    }

    /// Validates an access token and returns its claims.
    ///
    /// Without `token` the configured extractor reads it from `ctx`.
    /// Signature and time checks always run before the revocation lookup,
    /// so a malformed token never reaches the store. A revoked token is
    /// reported as [`TokenError::ExpiredToken`].
    pub async fn validate(&self, ctx: &AuthContext, token: Option<&str>) -> TokenResult<Claims> {
        let raw = self.raw_token(ctx, token)?;

        let params = self.policy.parse_params();
        let claims = match self.policy.access_parser().parse(ctx, &raw, &params) {
            Ok(claims) => claims,
            Err(TokenError::Validation(failure)) if failure.is_expired() => {
                debug!("Access token expired");
                return Err(TokenError::ExpiredToken);
            }
            Err(TokenError::Validation(failure)) => {
                debug!(reason = %failure, "Access token rejected");
                return Err(TokenError::InvalidToken);
            }
            Err(e) => return Err(e),
        };

        self.ensure_not_revoked(&claims).await?;

        debug!(token_id = %claims.jti, "Token validated");
        Ok(claims)
    }

    /// Re-issues a session from a previously issued token.
    ///
    /// 1. Parse leniently: signature only, timestamps may be stale
    /// 2. Reject revoked sessions
    /// 3. Run the caller's `check` with the claims and refresh lifetime
    /// 4. Re-stamp the same claims; identity and token ID are kept
    /// 5. Sign, then run the claims hook for the refresh lifetime
    ///
    /// Every parse failure is [`TokenError::InvalidToken`]. Because the
    /// token ID is kept, revoking any token of the chain revokes all.
    pub async fn refresh(
        &self,
        ctx: &AuthContext,
        token: Option<&str>,
        check: Option<&dyn RefreshCheck>,
    ) -> TokenResult<(TokenInfo, Claims)> {
        let raw = self.raw_token(ctx, token)?;

        let params = self.policy.parse_params();
        let mut claims = match self.policy.refresh_parser().parse(ctx, &raw, &params) {
            Ok(claims) => claims,
            Err(TokenError::Validation(failure)) => {
                debug!(reason = %failure, "Refresh token rejected");
                return Err(TokenError::InvalidToken);
            }
            Err(e) => return Err(e),
        };

        self.ensure_not_revoked(&claims).await?;

        if let Some(check) = check {
            check.check(&claims, self.policy.refresh_ttl()).await?;
        }

        let now = self.policy.clock().now();
        claims.stamp(now, self.policy.access_ttl());

        let access_token = self.sign(ctx, &claims)?;
        let refresh_ttl = self.shape_claims(ctx, &mut claims).await?;

        info!(token_id = %claims.jti, expires_at = claims.exp, "Token refreshed");
        Ok((self.token_info(&claims, access_token, now, refresh_ttl), claims))
    }

    /// Revokes the session `user` belongs to.
    ///
    /// `user` must be claims issued by this manager; anything else is
    /// [`TokenError::InvalidToken`]. The marker lives until the token
    /// would have expired. An already expired token still produces a
    /// write with a non-positive TTL, which stores ignore. Revoking twice
    /// is harmless.
    ///
    /// The marker's lifetime comes from `user`'s own `exp`, so pass the
    /// claims of the latest token of a refreshed chain. Claims of a token
    /// that expired before the last refresh write nothing and leave the
    /// refreshed token valid.
    pub async fn revoke(&self, user: &dyn UserInfo) -> TokenResult<()> {
        let claims = user.as_claims().ok_or(TokenError::InvalidToken)?;

        let ttl = claims.remaining_ttl(self.policy.clock().now());
        self.store
            .set_with_ttl(&keys::revoked_token(&claims.jti), ttl)
            .await?;

        info!(
            token_id = %claims.jti,
            ttl_secs = ttl.num_seconds(),
            "Token revoked"
        );
        Ok(())
    }

    /// Runs the external update hook, if one is installed.
    pub async fn update(&self, ctx: &AuthContext) -> TokenResult<()> {
        match self.policy.update_hook() {
            Some(hook) => hook.update(ctx).await,
            None => Ok(()),
        }
    }

    /// Closes the revocation store.
    pub async fn release(&self) -> TokenResult<()> {
        self.store.close().await?;
        info!("Token manager released");
        Ok(())
    }

    /// Explicit token, else the configured extractor.
    fn raw_token(&self, ctx: &AuthContext, token: Option<&str>) -> TokenResult<String> {
        match token {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => self.policy.extractor().extract(ctx),
        }
    }

    /// Reverse check: a marker for the token ID means logged out.
    async fn ensure_not_revoked(&self, claims: &Claims) -> TokenResult<()> {
        if self.store.exists(&keys::revoked_token(&claims.jti)).await? {
            warn!(token_id = %claims.jti, "Revoked token presented");
            return Err(TokenError::ExpiredToken);
        }
        Ok(())
    }

    /// Runs the claims hook and returns the effective refresh lifetime.
    async fn shape_claims(&self, ctx: &AuthContext, claims: &mut Claims) -> TokenResult<TimeDelta> {
        let mut refresh_ttl = self.policy.refresh_ttl();
        if let Some(hook) = self.policy.claims_hook() {
            let seconds = hook.shape(ctx, claims).await?;
            if seconds > 0 {
                refresh_ttl = TimeDelta::seconds(seconds);
            }
        }
        Ok(refresh_ttl)
    }

    fn sign(&self, ctx: &AuthContext, claims: &Claims) -> TokenResult<String> {
        self.policy.signer().sign(
            ctx,
            claims,
            self.policy.signing_method(),
            self.policy.signing_secret(),
        )
    }

    fn token_info(
        &self,
        claims: &Claims,
        access_token: String,
        now: DateTime<Utc>,
        refresh_ttl: TimeDelta,
    ) -> TokenInfo {
        TokenInfo {
            token_id: claims.jti.clone(),
            access_token,
            expires_at: claims.exp,
            refresh_token: refresh_token_for(&claims.jti),
            refresh_expires_at: (now + refresh_ttl).timestamp(),
        }
    }
}
