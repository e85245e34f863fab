//! Token validate command.

use clap::Args;

use revokit_auth::{AuthContext, TokenManager};
use revokit_core::error::AppError;

use crate::output::{self, OutputFormat};

use super::ClaimsRow;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Access token
    pub token: String,
}

/// Execute the validate command
pub async fn execute(
    args: &ValidateArgs,
    manager: &TokenManager,
    format: OutputFormat,
) -> Result<(), AppError> {
    let claims = manager
        .validate(&AuthContext::default(), Some(args.token.as_str()))
        .await?;
    output::print_row(&ClaimsRow::new(&claims, "active"), format);
    Ok(())
}
