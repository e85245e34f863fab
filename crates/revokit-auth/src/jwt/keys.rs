//! Verification key resolution.

use std::collections::HashMap;

use jsonwebtoken::{Algorithm, DecodingKey, Header};

use crate::error::{TokenResult, ValidationFailure};
use crate::strategy::AuthContext;

use super::secret::SigningSecret;

/// Key and algorithm a token's signature is checked against.
pub struct ResolvedKey {
    /// The only algorithm the verifier will accept.
    pub algorithm: Algorithm,
    /// Verification key.
    pub key: DecodingKey,
}

/// Picks the verification key for a parsed but unverified token header.
pub trait KeyResolver: Send + Sync {
    /// Resolves the key for `header` given the configured method and secret.
    fn resolve(
        &self,
        ctx: &AuthContext,
        header: &Header,
        method: Algorithm,
        secret: &SigningSecret,
    ) -> TokenResult<ResolvedKey>;
}

/// Default resolver: always the configured method and secret.
///
/// The header's `alg` is never trusted. A token that declares `none` or a
/// different algorithm is verified against the configured one and fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinnedKeyResolver;

impl KeyResolver for PinnedKeyResolver {
    fn resolve(
        &self,
        _ctx: &AuthContext,
        _header: &Header,
        method: Algorithm,
        secret: &SigningSecret,
    ) -> TokenResult<ResolvedKey> {
        Ok(ResolvedKey {
            algorithm: method,
            key: secret.decoding_key(method)?,
        })
    }
}

/// Selects the secret by the header's `kid`, still pinning the method.
///
/// Tokens without a `kid` are verified with the configured secret; an
/// unknown `kid` is rejected.
#[derive(Debug, Clone, Default)]
pub struct KeyIdResolver {
    keys: HashMap<String, SigningSecret>,
}

impl KeyIdResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `secret` under `kid`.
    pub fn with_key(mut self, kid: impl Into<String>, secret: SigningSecret) -> Self {
        self.keys.insert(kid.into(), secret);
        self
    }
}

impl KeyResolver for KeyIdResolver {
    fn resolve(
        &self,
        _ctx: &AuthContext,
        header: &Header,
        method: Algorithm,
        secret: &SigningSecret,
    ) -> TokenResult<ResolvedKey> {
        let secret = match header.kid.as_deref() {
            Some(kid) => self.keys.get(kid).ok_or_else(|| {
                ValidationFailure::Malformed(format!("unknown key id '{kid}'"))
            })?,
            None => secret,
        };
        Ok(ResolvedKey {
            algorithm: method,
            key: secret.decoding_key(method)?,
        })
    }
}
