//! Authentication outcomes.

use thiserror::Error;

use revokit_core::error::{AppError, ErrorKind};

/// Result alias for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// Errors returned by token operations.
///
/// Any error from `validate` or `refresh` means "not authenticated". The
/// split between [`TokenError::InvalidToken`] and [`TokenError::ExpiredToken`]
/// only tells the caller whether a silent refresh is worth attempting.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No raw token was supplied or found on the request.
    #[error("no token present")]
    NoToken,
    /// Signature or structure is wrong, or the value is not one of our claims.
    #[error("invalid token")]
    InvalidToken,
    /// The token expired naturally or was revoked. The two are reported
    /// identically so revocation state does not leak.
    #[error("token expired")]
    ExpiredToken,
    /// Raised by claims parsers; the token manager maps it to one of the
    /// outcomes above before returning.
    #[error("token validation failed: {0}")]
    Validation(#[from] ValidationFailure),
    /// Collaborator failure (revocation store, key material, hooks),
    /// passed through unchanged.
    #[error(transparent)]
    App(#[from] AppError),
}

/// Why a parser rejected a token.
#[derive(Debug, Error)]
pub enum ValidationFailure {
    /// `exp` has been reached.
    #[error("token has expired")]
    Expired,
    /// `nbf` lies in the future.
    #[error("token is not valid yet")]
    Immature,
    /// Signature, algorithm or structure check failed.
    #[error("{0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),
    /// Claims decoded but are unusable.
    #[error("malformed claims: {0}")]
    Malformed(String),
}

impl ValidationFailure {
    /// Returns `true` when the failure is a time-based expiry.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::App(inner) => inner,
            TokenError::Validation(failure) => AppError::with_source(
                ErrorKind::Authentication,
                "Token validation failed",
                failure,
            ),
            other => AppError::authentication(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_outcomes_map_to_authentication_kind() {
        for err in [
            TokenError::NoToken,
            TokenError::InvalidToken,
            TokenError::ExpiredToken,
        ] {
            let app: AppError = err.into();
            assert_eq!(app.kind, ErrorKind::Authentication);
        }
    }

    #[test]
    fn test_collaborator_errors_pass_through() {
        let app: AppError = TokenError::App(AppError::cache("redis down")).into();
        assert_eq!(app.kind, ErrorKind::Cache);
        assert_eq!(app.message, "redis down");
    }
}
