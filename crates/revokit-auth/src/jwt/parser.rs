//! Claims parsers: strict for access tokens, lenient for refresh.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};

use revokit_core::error::{AppError, ErrorKind};
use revokit_core::traits::Clock;

use crate::error::{TokenError, TokenResult, ValidationFailure};
use crate::strategy::AuthContext;

use super::claims::Claims;
use super::keys::KeyResolver;
use super::secret::SigningSecret;

/// Policy inputs a parser verifies against.
pub struct ParseParams<'a> {
    /// Configured signing method.
    pub method: Algorithm,
    /// Configured secret.
    pub secret: &'a SigningSecret,
    /// Verification key resolver.
    pub resolver: &'a dyn KeyResolver,
    /// Time source for expiry checks.
    pub clock: &'a dyn Clock,
}

/// Turns a raw token into claims.
///
/// Rejections are reported as [`TokenError::Validation`]; anything else
/// (key material, hooks) is a collaborator error.
pub trait ClaimsParser: Send + Sync {
    /// Parses and verifies `token`.
    fn parse(
        &self,
        ctx: &AuthContext,
        token: &str,
        params: &ParseParams<'_>,
    ) -> TokenResult<Claims>;
}

/// Access token parser: signature, `exp` and `nbf`.
///
/// A token is expired from the second `now` reaches `exp`. No leeway.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictClaimsParser;

impl ClaimsParser for StrictClaimsParser {
    fn parse(
        &self,
        ctx: &AuthContext,
        token: &str,
        params: &ParseParams<'_>,
    ) -> TokenResult<Claims> {
        let claims = verify_signature(ctx, token, params)?;

        let now = params.clock.unix_now();
        if now >= claims.exp {
            return Err(ValidationFailure::Expired.into());
        }
        if now < claims.nbf {
            return Err(ValidationFailure::Immature.into());
        }
        Ok(claims)
    }
}

/// Refresh parser: signature only.
///
/// The timestamps inside a token presented for refresh belong to the
/// access token it was issued as and are expected to be stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientClaimsParser;

impl ClaimsParser for LenientClaimsParser {
    fn parse(
        &self,
        ctx: &AuthContext,
        token: &str,
        params: &ParseParams<'_>,
    ) -> TokenResult<Claims> {
        verify_signature(ctx, token, params)
    }
}

/// Verifies the signature against the resolved key and decodes claims.
/// Time-based claims are left to the caller.
fn verify_signature(
    ctx: &AuthContext,
    token: &str,
    params: &ParseParams<'_>,
) -> TokenResult<Claims> {
    let header = decode_header(token).map_err(classify)?;
    let resolved = params
        .resolver
        .resolve(ctx, &header, params.method, params.secret)?;

    let mut validation = Validation::new(resolved.algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &resolved.key, &validation).map_err(classify)?;
    if data.claims.jti.is_empty() {
        return Err(ValidationFailure::Malformed("missing jti".to_string()).into());
    }
    Ok(data.claims)
}

/// Separates key material problems from token rejections.
fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    let key_problem = matches!(
        err.kind(),
        JwtErrorKind::InvalidKeyFormat
            | JwtErrorKind::InvalidRsaKey(_)
            | JwtErrorKind::InvalidEcdsaKey
    );
    if key_problem {
        let message = format!("Invalid key material: {err}");
        return AppError::with_source(ErrorKind::Crypto, message, err).into();
    }

    let timing = match err.kind() {
        JwtErrorKind::ExpiredSignature => Some(ValidationFailure::Expired),
        JwtErrorKind::ImmatureSignature => Some(ValidationFailure::Immature),
        _ => None,
    };
    timing.unwrap_or(ValidationFailure::Rejected(err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::Identity;
    use crate::jwt::keys::PinnedKeyResolver;
    use crate::jwt::signer::{JwtSigner, TokenSigner};
    use chrono::{DateTime, TimeDelta, Utc};

    #[derive(Debug)]
    struct At(DateTime<Utc>);

    impl Clock for At {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn issued_at(now: DateTime<Utc>, secret: &SigningSecret) -> (Claims, String) {
        let mut claims = Claims::new(Identity::new("u1"));
        claims.stamp(now, TimeDelta::seconds(60));
        let token = JwtSigner::new("JWT", None)
            .sign(&AuthContext::default(), &claims, Algorithm::HS512, secret)
            .unwrap();
        (claims, token)
    }

    fn parse_with(
        parser: &dyn ClaimsParser,
        token: &str,
        secret: &SigningSecret,
        clock: &dyn Clock,
    ) -> TokenResult<Claims> {
        let params = ParseParams {
            method: Algorithm::HS512,
            secret,
            resolver: &PinnedKeyResolver,
            clock,
        };
        parser.parse(&AuthContext::default(), token, &params)
    }

    #[test]
    fn test_strict_accepts_live_token() {
        let now = Utc::now();
        let secret = SigningSecret::hmac("s");
        let (claims, token) = issued_at(now, &secret);
        let parsed = parse_with(&StrictClaimsParser, &token, &secret, &At(now)).unwrap();
        assert_eq!(parsed, claims);
    }

    #[test]
    fn test_strict_expiry_boundary() {
        let now = Utc::now();
        let secret = SigningSecret::hmac("s");
        let (claims, token) = issued_at(now, &secret);
        let exp = DateTime::from_timestamp(claims.exp, 0).unwrap();

        let before = parse_with(&StrictClaimsParser, &token, &secret, &At(exp - TimeDelta::seconds(1)));
        assert!(before.is_ok());

        let at = parse_with(&StrictClaimsParser, &token, &secret, &At(exp));
        assert!(matches!(at, Err(TokenError::Validation(ValidationFailure::Expired))));
    }

    #[test]
    fn test_strict_rejects_not_yet_valid() {
        let now = Utc::now();
        let secret = SigningSecret::hmac("s");
        let (_, token) = issued_at(now, &secret);
        let result = parse_with(
            &StrictClaimsParser,
            &token,
            &secret,
            &At(now - TimeDelta::seconds(10)),
        );
        assert!(matches!(result, Err(TokenError::Validation(ValidationFailure::Immature))));
    }

    #[test]
    fn test_lenient_skips_time_checks() {
        let now = Utc::now();
        let secret = SigningSecret::hmac("s");
        let (claims, token) = issued_at(now, &secret);
        let later = At(now + TimeDelta::days(30));
        let parsed = parse_with(&LenientClaimsParser, &token, &secret, &later).unwrap();
        assert_eq!(parsed.jti, claims.jti);
    }

    #[test]
    fn test_wrong_secret_rejected_by_both() {
        let now = Utc::now();
        let (_, token) = issued_at(now, &SigningSecret::hmac("right"));
        let wrong = SigningSecret::hmac("wrong");
        for parser in [&StrictClaimsParser as &dyn ClaimsParser, &LenientClaimsParser] {
            let result = parse_with(parser, &token, &wrong, &At(now));
            assert!(matches!(result, Err(TokenError::Validation(ValidationFailure::Rejected(_)))));
        }
    }

    #[test]
    fn test_garbage_rejected() {
        let secret = SigningSecret::hmac("s");
        let result = parse_with(&StrictClaimsParser, "not.a.jwt", &secret, &At(Utc::now()));
        assert!(matches!(result, Err(TokenError::Validation(_))));
    }
}
