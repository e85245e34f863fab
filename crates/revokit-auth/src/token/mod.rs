//! Token policy, issued token result, and lifecycle manager.

pub mod info;
pub mod manager;
pub mod policy;

pub use info::{TokenInfo, refresh_token_for};
pub use manager::TokenManager;
pub use policy::{PolicyOptions, PolicyOverride, TokenPolicy};
