//! Token issue command.

use clap::Args;

use revokit_auth::{AuthContext, Identity, TokenManager};
use revokit_core::error::AppError;

use crate::output::OutputFormat;

/// Arguments for the issue command
#[derive(Debug, Args)]
pub struct IssueArgs {
    /// Subject (user ID)
    #[arg(short, long)]
    pub subject: String,
    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Role; repeat for several
    #[arg(short, long = "role")]
    pub roles: Vec<String>,
}

/// Execute the issue command
pub async fn execute(
    args: &IssueArgs,
    manager: &TokenManager,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut identity = Identity::new(args.subject.clone());
    if let Some(name) = &args.name {
        identity = identity.with_name(name.clone());
    }
    for role in &args.roles {
        identity = identity.with_role(role.clone());
    }

    let (info, _) = manager.issue(&AuthContext::default(), &identity).await?;
    super::print_token_info(&info, format)
}
