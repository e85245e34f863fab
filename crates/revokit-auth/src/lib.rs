//! # revokit-auth
//!
//! Session token lifecycle for services sharing one authentication layer.
//!
//! Tokens are trusted on signature and expiry alone unless their identifier
//! appears in the revocation store. Only explicit logouts are recorded
//! there, which keeps the store tiny compared to the number of live
//! sessions.
//!
//! ## Modules
//!
//! - `jwt`: claims model, signing secrets, signer, key resolution, claims parsers
//! - `strategy`: request context, raw token extraction, and caller hooks
//! - `token`: policy configuration, issued token result, and the [`TokenManager`]
//! - `error`: authentication outcomes ([`TokenError`])

pub mod error;
pub mod jwt;
pub mod strategy;
pub mod token;

pub use error::{TokenError, TokenResult, ValidationFailure};
pub use jwt::{Claims, Identity, SigningSecret, UserInfo};
pub use strategy::AuthContext;
pub use token::{TokenInfo, TokenManager, TokenPolicy};
