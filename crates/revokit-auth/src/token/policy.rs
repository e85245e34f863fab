//! Token policy: durations, key material and pluggable strategies.
//!
//! A policy is resolved once from defaults plus an ordered list of
//! overrides and is read-only afterwards:
//!
//! ```ignore
//! use revokit_auth::token::policy::{self, TokenPolicy};
//!
//! let policy = TokenPolicy::resolve([
//!     policy::with_signing_secret("s3cret"),
//!     policy::with_access_ttl(chrono::TimeDelta::minutes(15)),
//! ]);
//! ```
//!
//! Whether the signing method fits the secret is not checked here; a
//! mismatch surfaces on the first sign or parse.

use std::str::FromStr;
use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::Algorithm;

use revokit_core::config::{AuthConfig, ExtractorKind};
use revokit_core::error::AppError;
use revokit_core::result::AppResult;
use revokit_core::traits::{Clock, SystemClock};

use crate::jwt::{
    ClaimsParser, JwtSigner, KeyResolver, LenientClaimsParser, ParseParams, PinnedKeyResolver,
    SigningSecret, StrictClaimsParser, TokenSigner,
};
use crate::strategy::{
    BearerExtractor, ClaimsHook, CookieExtractor, FormExtractor, TokenExtractor, UpdateHook,
};

/// Default token type label.
const DEFAULT_TOKEN_TYPE: &str = "JWT";
/// Default access token lifetime: 2 hours.
const DEFAULT_ACCESS_TTL_SECS: i64 = 2 * 3600;
/// Default refresh token lifetime: 7 days.
const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 3600;

/// Options as they stand while overrides are being applied.
pub struct PolicyOptions {
    /// Token type label.
    pub token_type: String,
    /// Access token lifetime.
    pub access_ttl: TimeDelta,
    /// Refresh token lifetime.
    pub refresh_ttl: TimeDelta,
    /// Signing method.
    pub signing_method: Algorithm,
    /// Signing secret; generated when still unset after all overrides.
    pub signing_secret: Option<SigningSecret>,
    /// Header `kid` written by the default signer.
    pub key_id: Option<String>,
    /// Signing strategy.
    pub signer: Option<Arc<dyn TokenSigner>>,
    /// Key resolution strategy.
    pub key_resolver: Option<Arc<dyn KeyResolver>>,
    /// Access token parsing strategy.
    pub access_parser: Option<Arc<dyn ClaimsParser>>,
    /// Refresh token parsing strategy.
    pub refresh_parser: Option<Arc<dyn ClaimsParser>>,
    /// Raw token extraction strategy.
    pub extractor: Option<Arc<dyn TokenExtractor>>,
    /// Claim shaping hook.
    pub claims_hook: Option<Arc<dyn ClaimsHook>>,
    /// External update hook.
    pub update_hook: Option<Arc<dyn UpdateHook>>,
    /// Time source.
    pub clock: Option<Arc<dyn Clock>>,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            access_ttl: TimeDelta::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: TimeDelta::seconds(DEFAULT_REFRESH_TTL_SECS),
            signing_method: Algorithm::HS512,
            signing_secret: None,
            key_id: None,
            signer: None,
            key_resolver: None,
            access_parser: None,
            refresh_parser: None,
            extractor: None,
            claims_hook: None,
            update_hook: None,
            clock: None,
        }
    }
}

/// A single override applied during resolution.
pub type PolicyOverride = Box<dyn FnOnce(&mut PolicyOptions) + Send>;

/// Sets the token type label.
pub fn with_token_type(label: impl Into<String>) -> PolicyOverride {
    let label = label.into();
    Box::new(move |o| o.token_type = label)
}

/// Sets the access token lifetime.
pub fn with_access_ttl(ttl: TimeDelta) -> PolicyOverride {
    Box::new(move |o| o.access_ttl = ttl)
}

/// Sets the refresh token lifetime.
pub fn with_refresh_ttl(ttl: TimeDelta) -> PolicyOverride {
    Box::new(move |o| o.refresh_ttl = ttl)
}

/// Sets the signing method.
pub fn with_signing_method(method: Algorithm) -> PolicyOverride {
    Box::new(move |o| o.signing_method = method)
}

/// Sets a shared HMAC signing secret.
pub fn with_signing_secret(secret: impl Into<Vec<u8>>) -> PolicyOverride {
    with_signing_key(SigningSecret::hmac(secret))
}

/// Sets the signing key material.
pub fn with_signing_key(secret: SigningSecret) -> PolicyOverride {
    Box::new(move |o| o.signing_secret = Some(secret))
}

/// Sets the header `kid` written by the default signer.
pub fn with_key_id(kid: impl Into<String>) -> PolicyOverride {
    let kid = kid.into();
    Box::new(move |o| o.key_id = Some(kid))
}

/// Replaces the signing strategy.
pub fn with_signer(signer: impl TokenSigner + 'static) -> PolicyOverride {
    let signer: Arc<dyn TokenSigner> = Arc::new(signer);
    Box::new(move |o| o.signer = Some(signer))
}

/// Replaces the key resolution strategy.
pub fn with_key_resolver(resolver: impl KeyResolver + 'static) -> PolicyOverride {
    let resolver: Arc<dyn KeyResolver> = Arc::new(resolver);
    Box::new(move |o| o.key_resolver = Some(resolver))
}

/// Replaces the access token parser.
pub fn with_access_parser(parser: impl ClaimsParser + 'static) -> PolicyOverride {
    let parser: Arc<dyn ClaimsParser> = Arc::new(parser);
    Box::new(move |o| o.access_parser = Some(parser))
}

/// Replaces the refresh token parser.
pub fn with_refresh_parser(parser: impl ClaimsParser + 'static) -> PolicyOverride {
    let parser: Arc<dyn ClaimsParser> = Arc::new(parser);
    Box::new(move |o| o.refresh_parser = Some(parser))
}

/// Replaces the raw token extractor.
pub fn with_extractor(extractor: impl TokenExtractor + 'static) -> PolicyOverride {
    let extractor: Arc<dyn TokenExtractor> = Arc::new(extractor);
    Box::new(move |o| o.extractor = Some(extractor))
}

/// Installs the claim shaping hook.
pub fn with_claims_hook(hook: impl ClaimsHook + 'static) -> PolicyOverride {
    let hook: Arc<dyn ClaimsHook> = Arc::new(hook);
    Box::new(move |o| o.claims_hook = Some(hook))
}

/// Installs the external update hook.
pub fn with_update_hook(hook: impl UpdateHook + 'static) -> PolicyOverride {
    let hook: Arc<dyn UpdateHook> = Arc::new(hook);
    Box::new(move |o| o.update_hook = Some(hook))
}

/// Replaces the time source.
pub fn with_clock(clock: Arc<dyn Clock>) -> PolicyOverride {
    Box::new(move |o| o.clock = Some(clock))
}

/// Resolved, immutable token policy.
#[derive(Clone)]
pub struct TokenPolicy {
    token_type: String,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
    signing_method: Algorithm,
    signing_secret: SigningSecret,
    signer: Arc<dyn TokenSigner>,
    key_resolver: Arc<dyn KeyResolver>,
    access_parser: Arc<dyn ClaimsParser>,
    refresh_parser: Arc<dyn ClaimsParser>,
    extractor: Arc<dyn TokenExtractor>,
    claims_hook: Option<Arc<dyn ClaimsHook>>,
    update_hook: Option<Arc<dyn UpdateHook>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPolicy")
            .field("token_type", &self.token_type)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("signing_method", &self.signing_method)
            .field("signing_secret", &self.signing_secret)
            .field("claims_hook", &self.claims_hook.is_some())
            .field("update_hook", &self.update_hook.is_some())
            .finish()
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::resolve(std::iter::empty())
    }
}

impl TokenPolicy {
    /// Applies `overrides` in order on top of the defaults.
    pub fn resolve(overrides: impl IntoIterator<Item = PolicyOverride>) -> Self {
        let mut options = PolicyOptions::default();
        for apply in overrides {
            apply(&mut options);
        }

        let PolicyOptions {
            token_type,
            access_ttl,
            refresh_ttl,
            signing_method,
            signing_secret,
            key_id,
            signer,
            key_resolver,
            access_parser,
            refresh_parser,
            extractor,
            claims_hook,
            update_hook,
            clock,
        } = options;

        let signer =
            signer.unwrap_or_else(|| Arc::new(JwtSigner::new(token_type.clone(), key_id)));

        Self {
            token_type,
            access_ttl,
            refresh_ttl,
            signing_method,
            signing_secret: signing_secret.unwrap_or_else(SigningSecret::generate),
            signer,
            key_resolver: key_resolver.unwrap_or_else(|| Arc::new(PinnedKeyResolver)),
            access_parser: access_parser.unwrap_or_else(|| Arc::new(StrictClaimsParser)),
            refresh_parser: refresh_parser.unwrap_or_else(|| Arc::new(LenientClaimsParser)),
            extractor: extractor.unwrap_or_else(|| Arc::new(BearerExtractor)),
            claims_hook,
            update_hook,
            clock: clock.unwrap_or_else(|| Arc::new(SystemClock)),
        }
    }

    /// Resolves a policy from the `auth` configuration section.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        Ok(Self::resolve(Self::config_overrides(config)?))
    }

    /// Translates the `auth` configuration section into overrides, so
    /// callers can append their own hooks before resolving.
    pub fn config_overrides(config: &AuthConfig) -> AppResult<Vec<PolicyOverride>> {
        let method = Algorithm::from_str(&config.signing_method).map_err(|e| {
            AppError::configuration(format!(
                "Unknown signing method '{}': {e}",
                config.signing_method
            ))
        })?;

        let mut overrides = vec![
            with_token_type(config.token_type.clone()),
            with_access_ttl(seconds(config.access_ttl_seconds, "access_ttl_seconds")?),
            with_refresh_ttl(seconds(config.refresh_ttl_seconds, "refresh_ttl_seconds")?),
            with_signing_method(method),
        ];

        if let Some(secret) = load_secret(config)? {
            overrides.push(with_signing_key(secret));
        }

        overrides.push(match config.extractor {
            ExtractorKind::Bearer => with_extractor(BearerExtractor),
            ExtractorKind::Form => with_extractor(FormExtractor),
            ExtractorKind::Cookie => with_extractor(CookieExtractor),
        });

        Ok(overrides)
    }

    /// Token type label.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> TimeDelta {
        self.access_ttl
    }

    /// Default refresh token lifetime.
    pub fn refresh_ttl(&self) -> TimeDelta {
        self.refresh_ttl
    }

    /// Signing method.
    pub fn signing_method(&self) -> Algorithm {
        self.signing_method
    }

    /// Signing secret.
    pub fn signing_secret(&self) -> &SigningSecret {
        &self.signing_secret
    }

    /// Signing strategy.
    pub fn signer(&self) -> &dyn TokenSigner {
        self.signer.as_ref()
    }

    /// Access token parser.
    pub fn access_parser(&self) -> &dyn ClaimsParser {
        self.access_parser.as_ref()
    }

    /// Refresh token parser.
    pub fn refresh_parser(&self) -> &dyn ClaimsParser {
        self.refresh_parser.as_ref()
    }

    /// Raw token extractor.
    pub fn extractor(&self) -> &dyn TokenExtractor {
        self.extractor.as_ref()
    }

    /// Claim shaping hook, if installed.
    pub fn claims_hook(&self) -> Option<&dyn ClaimsHook> {
        self.claims_hook.as_deref()
    }

    /// External update hook, if installed.
    pub fn update_hook(&self) -> Option<&dyn UpdateHook> {
        self.update_hook.as_deref()
    }

    /// Time source.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Inputs handed to claims parsers.
    pub fn parse_params(&self) -> ParseParams<'_> {
        ParseParams {
            method: self.signing_method,
            secret: &self.signing_secret,
            resolver: self.key_resolver.as_ref(),
            clock: self.clock.as_ref(),
        }
    }
}

fn seconds(value: u64, field: &str) -> AppResult<TimeDelta> {
    i64::try_from(value)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| AppError::configuration(format!("{field} is out of range: {value}")))
}

/// Reads key material named by the configuration, if any.
fn load_secret(config: &AuthConfig) -> AppResult<Option<SigningSecret>> {
    if let Some(path) = &config.signing_secret_file {
        let private = std::fs::read(path)?;
        let secret = match &config.verifying_key_file {
            Some(public_path) => SigningSecret::Pem {
                private,
                public: std::fs::read(public_path)?,
            },
            None => SigningSecret::Hmac(private),
        };
        return Ok(Some(secret));
    }
    Ok(config.signing_secret.clone().map(SigningSecret::hmac))
}

#[cfg(test)]
mod tests {
    use super::*;
    use revokit_core::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let policy = TokenPolicy::default();
        assert_eq!(policy.token_type(), "JWT");
        assert_eq!(policy.access_ttl(), TimeDelta::hours(2));
        assert_eq!(policy.refresh_ttl(), TimeDelta::days(7));
        assert_eq!(policy.signing_method(), Algorithm::HS512);
        assert!(matches!(policy.signing_secret(), SigningSecret::Hmac(_)));
        assert!(policy.claims_hook().is_none());
        assert!(policy.update_hook().is_none());
    }

    #[test]
    fn test_overrides_apply_in_order() {
        let policy = TokenPolicy::resolve([
            with_access_ttl(TimeDelta::minutes(5)),
            with_signing_secret("first"),
            with_access_ttl(TimeDelta::minutes(10)),
            with_signing_secret("second"),
        ]);
        assert_eq!(policy.access_ttl(), TimeDelta::minutes(10));
        assert_eq!(policy.signing_secret(), &SigningSecret::hmac("second"));
    }

    #[test]
    fn test_random_secret_differs_per_policy() {
        let a = TokenPolicy::default();
        let b = TokenPolicy::default();
        assert_ne!(a.signing_secret(), b.signing_secret());
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            access_ttl_seconds: 900,
            signing_method: "HS256".to_string(),
            signing_secret: Some("cfg-secret".to_string()),
            ..AuthConfig::default()
        };
        let policy = TokenPolicy::from_config(&config).unwrap();
        assert_eq!(policy.access_ttl(), TimeDelta::minutes(15));
        assert_eq!(policy.refresh_ttl(), TimeDelta::days(7));
        assert_eq!(policy.signing_method(), Algorithm::HS256);
        assert_eq!(policy.signing_secret(), &SigningSecret::hmac("cfg-secret"));
    }

    #[test]
    fn test_unknown_method_is_configuration_error() {
        let config = AuthConfig {
            signing_method: "HS999".to_string(),
            ..AuthConfig::default()
        };
        let err = TokenPolicy::from_config(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_secret_file_is_io_error() {
        let config = AuthConfig {
            signing_secret_file: Some("/nonexistent/revokit/secret".to_string()),
            ..AuthConfig::default()
        };
        let err = TokenPolicy::from_config(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }

    #[test]
    fn test_mismatched_method_is_accepted_at_resolution() {
        let policy = TokenPolicy::resolve([
            with_signing_method(Algorithm::RS256),
            with_signing_secret("hmac-only"),
        ]);
        assert_eq!(policy.signing_method(), Algorithm::RS256);
    }
}
