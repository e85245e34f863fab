//! Token policy configuration.

use serde::{Deserialize, Serialize};

/// Token issuance and verification configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Cosmetic token type label written into the JWT header `typ`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: u64,
    /// JWS algorithm name (`HS256`, `HS384`, `HS512`, `RS256`, `ES256`, ...).
    #[serde(default = "default_signing_method")]
    pub signing_method: String,
    /// Shared signing secret. A random secret is generated when absent.
    #[serde(default)]
    pub signing_secret: Option<String>,
    /// File holding the signing key (raw HMAC bytes or a PEM private key).
    /// Takes precedence over `signing_secret`.
    #[serde(default)]
    pub signing_secret_file: Option<String>,
    /// PEM public key used for verification with asymmetric methods. When
    /// set, `signing_secret_file` must hold the matching private key.
    #[serde(default)]
    pub verifying_key_file: Option<String>,
    /// Where raw tokens are read from on inbound requests.
    #[serde(default)]
    pub extractor: ExtractorKind,
}

/// Raw token source on inbound requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// `Authorization: Bearer <token>` header.
    #[default]
    Bearer,
    /// `token` form field.
    Form,
    /// `authorization` cookie.
    Cookie,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_type: default_token_type(),
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_seconds: default_refresh_ttl(),
            signing_method: default_signing_method(),
            signing_secret: None,
            signing_secret_file: None,
            verifying_key_file: None,
            extractor: ExtractorKind::default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_type", &self.token_type)
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .field("signing_method", &self.signing_method)
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "****"))
            .field("signing_secret_file", &self.signing_secret_file)
            .field("verifying_key_file", &self.verifying_key_file)
            .field("extractor", &self.extractor)
            .finish()
    }
}

fn default_token_type() -> String {
    "JWT".to_string()
}

fn default_access_ttl() -> u64 {
    2 * 3600
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 3600
}

fn default_signing_method() -> String {
    "HS512".to_string()
}
