//! JWT token creation.

use jsonwebtoken::{Algorithm, Header, encode};

use revokit_core::error::{AppError, ErrorKind};

use crate::error::TokenResult;
use crate::strategy::AuthContext;

use super::claims::Claims;
use super::secret::SigningSecret;

/// Turns claims into a signed wire token.
pub trait TokenSigner: Send + Sync {
    /// Signs `claims` with `method` and `secret`.
    fn sign(
        &self,
        ctx: &AuthContext,
        claims: &Claims,
        method: Algorithm,
        secret: &SigningSecret,
    ) -> TokenResult<String>;
}

/// Default signer producing compact JWS tokens.
#[derive(Debug, Clone)]
pub struct JwtSigner {
    /// Header `typ` value.
    token_type: String,
    /// Header `kid` value, if any.
    key_id: Option<String>,
}

impl JwtSigner {
    /// Creates a signer writing `token_type` into the header.
    pub fn new(token_type: impl Into<String>, key_id: Option<String>) -> Self {
        Self {
            token_type: token_type.into(),
            key_id,
        }
    }
}

impl TokenSigner for JwtSigner {
    fn sign(
        &self,
        _ctx: &AuthContext,
        claims: &Claims,
        method: Algorithm,
        secret: &SigningSecret,
    ) -> TokenResult<String> {
        let mut header = Header::new(method);
        header.typ = Some(self.token_type.clone());
        header.kid = self.key_id.clone();

        let key = secret.encoding_key(method)?;
        let token = encode(&header, claims, &key).map_err(|e| {
            AppError::with_source(ErrorKind::Crypto, format!("Failed to sign token: {e}"), e)
        })?;
        Ok(token)
    }
}
