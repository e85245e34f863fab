//! Token inspect command.

use clap::Args;

use revokit_auth::{AuthContext, TokenError, TokenManager};
use revokit_core::error::AppError;

use crate::output::{self, OutputFormat};

use super::ClaimsRow;

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Token to inspect
    pub token: String,
}

/// Execute the inspect command
///
/// Unlike `validate`, reports expired and revoked tokens instead of
/// failing on them. The signature must still verify.
pub async fn execute(
    args: &InspectArgs,
    manager: &TokenManager,
    format: OutputFormat,
) -> Result<(), AppError> {
    let claims = super::verified_claims(manager, &args.token)?;
    let now = manager.policy().clock().now();

    let status = match manager
        .validate(&AuthContext::default(), Some(args.token.as_str()))
        .await
    {
        Ok(_) => "active",
        Err(TokenError::ExpiredToken) if claims.is_expired_at(now) => "expired",
        Err(TokenError::ExpiredToken) => "revoked",
        Err(TokenError::InvalidToken) => "not yet valid",
        Err(e) => return Err(e.into()),
    };

    output::print_row(&ClaimsRow::new(&claims, status), format);
    Ok(())
}
