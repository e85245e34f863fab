//! Token refresh command.

use clap::Args;

use revokit_auth::{AuthContext, TokenManager};
use revokit_core::error::AppError;

use crate::output::OutputFormat;

/// Arguments for the refresh command
#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Previously issued access token, expired or not
    pub token: String,
}

/// Execute the refresh command
pub async fn execute(
    args: &RefreshArgs,
    manager: &TokenManager,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (info, _) = manager
        .refresh(&AuthContext::default(), Some(args.token.as_str()), None)
        .await?;
    super::print_token_info(&info, format)
}
