//! Signing secrets and key material construction.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use tracing::warn;

use revokit_core::error::{AppError, ErrorKind};

use crate::error::TokenResult;

/// Length of generated secrets in bytes.
const GENERATED_SECRET_LEN: usize = 32;

/// Key material used to sign and verify tokens.
///
/// Whether the material fits the configured method is only checked when
/// a key is first built for signing or verification.
#[derive(Clone, PartialEq, Eq)]
pub enum SigningSecret {
    /// Shared secret for the `HS*` family.
    Hmac(Vec<u8>),
    /// PEM encoded key pair for `RS*`, `PS*`, `ES*` and `EdDSA`.
    Pem {
        /// Private key used for signing.
        private: Vec<u8>,
        /// Public key used for verification.
        public: Vec<u8>,
    },
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hmac(_) => f.write_str("SigningSecret::Hmac(****)"),
            Self::Pem { .. } => f.write_str("SigningSecret::Pem(****)"),
        }
    }
}

impl SigningSecret {
    /// Wraps a shared HMAC secret.
    pub fn hmac(secret: impl Into<Vec<u8>>) -> Self {
        Self::Hmac(secret.into())
    }

    /// Generates an HMAC secret from 32 random bytes, base64url encoded.
    ///
    /// The encoded value is logged once so operators can pin it in
    /// configuration; several processes verifying each other's tokens
    /// must share one secret.
    pub fn generate() -> Self {
        let bytes: [u8; GENERATED_SECRET_LEN] = rand::random();
        let encoded = URL_SAFE_NO_PAD.encode(bytes);
        warn!(secret = %encoded, "No signing secret configured, generated a random one");
        Self::Hmac(encoded.into_bytes())
    }

    /// Builds the key used to sign with `method`.
    pub fn encoding_key(&self, method: Algorithm) -> TokenResult<EncodingKey> {
        let key = match (self, method) {
            (Self::Hmac(secret), Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => {
                EncodingKey::from_secret(secret)
            }
            (
                Self::Pem { private, .. },
                Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512,
            ) => EncodingKey::from_rsa_pem(private).map_err(key_error)?,
            (Self::Pem { private, .. }, Algorithm::ES256 | Algorithm::ES384) => {
                EncodingKey::from_ec_pem(private).map_err(key_error)?
            }
            (Self::Pem { private, .. }, Algorithm::EdDSA) => {
                EncodingKey::from_ed_pem(private).map_err(key_error)?
            }
            (secret, method) => return Err(mismatch(secret, method)),
        };
        Ok(key)
    }

    /// Builds the key used to verify signatures made with `method`.
    pub fn decoding_key(&self, method: Algorithm) -> TokenResult<DecodingKey> {
        let key = match (self, method) {
            (Self::Hmac(secret), Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => {
                DecodingKey::from_secret(secret)
            }
            (
                Self::Pem { public, .. },
                Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512,
            ) => DecodingKey::from_rsa_pem(public).map_err(key_error)?,
            (Self::Pem { public, .. }, Algorithm::ES256 | Algorithm::ES384) => {
                DecodingKey::from_ec_pem(public).map_err(key_error)?
            }
            (Self::Pem { public, .. }, Algorithm::EdDSA) => {
                DecodingKey::from_ed_pem(public).map_err(key_error)?
            }
            (secret, method) => return Err(mismatch(secret, method)),
        };
        Ok(key)
    }
}

fn key_error(e: jsonwebtoken::errors::Error) -> crate::error::TokenError {
    AppError::with_source(ErrorKind::Crypto, format!("Invalid key material: {e}"), e).into()
}

fn mismatch(secret: &SigningSecret, method: Algorithm) -> crate::error::TokenError {
    let kind = match secret {
        SigningSecret::Hmac(_) => "an HMAC secret",
        SigningSecret::Pem { .. } => "a PEM key pair",
    };
    AppError::crypto(format!("Signing method {method:?} cannot be used with {kind}")).into()
}
