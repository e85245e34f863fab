//! JWT claims, key material, signing and parsing.

pub mod claims;
pub mod keys;
pub mod parser;
pub mod secret;
pub mod signer;

pub use claims::{Claims, Identity, UserInfo};
pub use keys::{KeyIdResolver, KeyResolver, PinnedKeyResolver, ResolvedKey};
pub use parser::{ClaimsParser, LenientClaimsParser, ParseParams, StrictClaimsParser};
pub use secret::SigningSecret;
pub use signer::{JwtSigner, TokenSigner};
