//! Revocation store key builders shared by every backend and the token manager.

/// Namespace for revoked token identifiers.
const TOKEN_NAMESPACE: &str = "token:";

/// Store key marking the token identified by `token_id` as revoked.
pub fn revoked_token(token_id: &str) -> String {
    format!("{TOKEN_NAMESPACE}{token_id}")
}
