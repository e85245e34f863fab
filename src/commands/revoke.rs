//! Token revoke command.

use clap::Args;

use revokit_auth::TokenManager;
use revokit_core::error::AppError;

use crate::output;

/// Arguments for the revoke command
#[derive(Debug, Args)]
pub struct RevokeArgs {
    /// Latest unexpired token of the session
    pub token: String,
}

/// Execute the revoke command
///
/// The marker lives as long as the presented token would, so an expired
/// token cannot end a session that was refreshed since; it is refused
/// rather than reported as revoked.
pub async fn execute(args: &RevokeArgs, manager: &TokenManager) -> Result<(), AppError> {
    let claims = super::verified_claims(manager, &args.token)?;

    let now = manager.policy().clock().now();
    if claims.is_expired_at(now) {
        return Err(AppError::authentication(format!(
            "Token of session {} has expired; revoke with the session's latest token",
            claims.jti
        )));
    }

    manager.revoke(&claims).await?;

    output::print_success(&format!("Session {} revoked", claims.jti));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::TimeDelta;
    use revokit_auth::token::policy::{with_access_ttl, with_signing_secret};
    use revokit_auth::{AuthContext, Identity, TokenError};
    use revokit_cache::RevocationStoreManager;
    use revokit_core::config::CacheConfig;
    use revokit_core::error::ErrorKind;

    async fn manager(access_ttl: TimeDelta) -> TokenManager {
        let store = RevocationStoreManager::new(&CacheConfig::default())
            .await
            .unwrap();
        TokenManager::new(
            Arc::new(store),
            [with_signing_secret("cli-secret"), with_access_ttl(access_ttl)],
        )
    }

    #[tokio::test]
    async fn test_revoke_live_token() {
        let manager = manager(TimeDelta::hours(1)).await;
        let (info, _) = manager
            .issue(&AuthContext::default(), &Identity::new("u1"))
            .await
            .unwrap();

        let args = RevokeArgs {
            token: info.access_token().to_string(),
        };
        execute(&args, &manager).await.unwrap();

        let result = manager
            .validate(&AuthContext::default(), Some(info.access_token()))
            .await;
        assert!(matches!(result, Err(TokenError::ExpiredToken)));
    }

    #[tokio::test]
    async fn test_revoke_refuses_expired_token() {
        let manager = manager(TimeDelta::seconds(-60)).await;
        let (info, _) = manager
            .issue(&AuthContext::default(), &Identity::new("u1"))
            .await
            .unwrap();

        let args = RevokeArgs {
            token: info.access_token().to_string(),
        };
        let err = execute(&args, &manager).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
