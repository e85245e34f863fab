//! Raw token extraction from inbound requests.

use crate::error::{TokenError, TokenResult};

use super::context::AuthContext;

/// Pulls the raw token string out of a request.
pub trait TokenExtractor: Send + Sync {
    /// Returns the raw token, or [`TokenError::NoToken`].
    fn extract(&self, ctx: &AuthContext) -> TokenResult<String>;
}

/// Reads `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerExtractor;

impl TokenExtractor for BearerExtractor {
    fn extract(&self, ctx: &AuthContext) -> TokenResult<String> {
        ctx.header("authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(TokenError::NoToken)
    }
}

/// Reads the `token` form field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormExtractor;

impl TokenExtractor for FormExtractor {
    fn extract(&self, ctx: &AuthContext) -> TokenResult<String> {
        ctx.form_field("token")
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(TokenError::NoToken)
    }
}

/// Reads the `authorization` cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieExtractor;

impl TokenExtractor for CookieExtractor {
    fn extract(&self, ctx: &AuthContext) -> TokenResult<String> {
        ctx.cookie("authorization")
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(TokenError::NoToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http::header::{AUTHORIZATION, COOKIE};

    #[test]
    fn test_bearer() {
        let ctx = AuthContext::default()
            .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(BearerExtractor.extract(&ctx).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_requires_scheme() {
        let ctx = AuthContext::default()
            .with_header(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(matches!(BearerExtractor.extract(&ctx), Err(TokenError::NoToken)));

        let empty = AuthContext::default()
            .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(BearerExtractor.extract(&empty), Err(TokenError::NoToken)));
    }

    #[test]
    fn test_form() {
        let ctx = AuthContext::default().with_form_field("token", "t1");
        assert_eq!(FormExtractor.extract(&ctx).unwrap(), "t1");
        assert!(matches!(
            FormExtractor.extract(&AuthContext::default()),
            Err(TokenError::NoToken)
        ));
    }

    #[test]
    fn test_cookie() {
        let ctx = AuthContext::default()
            .with_header(COOKIE, HeaderValue::from_static("authorization=t2; other=x"));
        assert_eq!(CookieExtractor.extract(&ctx).unwrap(), "t2");
        assert!(matches!(
            CookieExtractor.extract(&AuthContext::default()),
            Err(TokenError::NoToken)
        ));
    }

    #[test]
    fn test_one_source_only() {
        let ctx = AuthContext::default().with_form_field("token", "t1");
        assert!(matches!(BearerExtractor.extract(&ctx), Err(TokenError::NoToken)));
    }
}
