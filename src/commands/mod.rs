//! CLI command definitions and dispatch.

pub mod inspect;
pub mod issue;
pub mod refresh;
pub mod revoke;
pub mod validate;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use revokit_auth::{AuthContext, Claims, TokenInfo, TokenManager, TokenPolicy};
use revokit_cache::RevocationStoreManager;
use revokit_core::config::AppConfig;
use revokit_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Revokit: session tokens with reverse revocation
#[derive(Debug, Parser)]
#[command(name = "revokit", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Issue a token for a subject
    Issue(issue::IssueArgs),
    /// Validate an access token
    Validate(validate::ValidateArgs),
    /// Refresh a session from a previously issued token
    Refresh(refresh::RefreshArgs),
    /// Revoke the session a token belongs to
    Revoke(revoke::RevokeArgs),
    /// Show a token's claims and status
    Inspect(inspect::InspectArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        ensure_pinned_secret(&self.command, config)?;
        let manager = build_manager(config).await?;
        self.run(&manager).await
    }

    /// Dispatch to the subcommand, then release the store. A release
    /// failure is logged and never replaces the command's own result.
    pub async fn run(&self, manager: &TokenManager) -> Result<(), AppError> {
        info!(command = self.command.name(), "Running command");
        let result = match &self.command {
            Commands::Issue(args) => issue::execute(args, manager, self.format).await,
            Commands::Validate(args) => validate::execute(args, manager, self.format).await,
            Commands::Refresh(args) => refresh::execute(args, manager, self.format).await,
            Commands::Revoke(args) => revoke::execute(args, manager).await,
            Commands::Inspect(args) => inspect::execute(args, manager, self.format).await,
        };

        if let Err(e) = manager.release().await {
            warn!(error = %e, "Failed to release revocation store");
        }
        result
    }
}

impl Commands {
    /// Subcommand name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Issue(_) => "issue",
            Self::Validate(_) => "validate",
            Self::Refresh(_) => "refresh",
            Self::Revoke(_) => "revoke",
            Self::Inspect(_) => "inspect",
        }
    }
}

/// Helper: reject commands that read tokens when no signing secret is
/// configured. Each run would generate its own random secret and could
/// never verify a token issued by an earlier run.
pub fn ensure_pinned_secret(command: &Commands, config: &AppConfig) -> Result<(), AppError> {
    let pinned = config.auth.signing_secret.is_some() || config.auth.signing_secret_file.is_some();
    if pinned || matches!(command, Commands::Issue(_)) {
        return Ok(());
    }
    Err(AppError::configuration(format!(
        "'{}' needs auth.signing_secret or auth.signing_secret_file to be set",
        command.name()
    )))
}

/// Helper: build a token manager over the configured revocation store
pub async fn build_manager(config: &AppConfig) -> Result<TokenManager, AppError> {
    let store = RevocationStoreManager::new(&config.cache).await?;
    let policy = TokenPolicy::from_config(&config.auth)?;
    Ok(TokenManager::with_policy(Arc::new(store), policy))
}

/// Helper: signature-checked claims, ignoring timestamps
pub fn verified_claims(manager: &TokenManager, token: &str) -> Result<Claims, AppError> {
    let policy = manager.policy();
    let claims = policy
        .refresh_parser()
        .parse(&AuthContext::default(), token, &policy.parse_params())?;
    Ok(claims)
}

/// Claims display row
#[derive(Debug, Serialize, Tabled)]
pub struct ClaimsRow {
    /// Token ID
    pub token_id: String,
    /// Subject
    pub subject: String,
    /// Display name
    pub name: String,
    /// Roles
    pub roles: String,
    /// Issued
    pub issued_at: String,
    /// Expires
    pub expires_at: String,
    /// Status
    pub status: String,
}

impl ClaimsRow {
    /// Build a row from claims and a status label
    pub fn new(claims: &Claims, status: &str) -> Self {
        Self {
            token_id: claims.jti.clone(),
            subject: claims.identity.sub.clone(),
            name: claims.identity.name.clone().unwrap_or_default(),
            roles: claims.identity.roles.join(","),
            issued_at: output::timestamp(claims.iat),
            expires_at: output::timestamp(claims.exp),
            status: status.to_string(),
        }
    }
}

/// Helper: print an issued token
pub fn print_token_info(info: &TokenInfo, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(info)?),
        OutputFormat::Table => {
            output::print_kv("Token ID", info.token_id());
            output::print_kv("Access token", info.access_token());
            output::print_kv("Expires", &output::timestamp(info.expires_at()));
            output::print_kv("Refresh token", info.refresh_token());
            output::print_kv("Refresh expires", &output::timestamp(info.refresh_expires_at()));
        }
    }
    Ok(())
}
