//! Issued token result returned to callers.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use revokit_core::result::AppResult;

/// Prefix of derived refresh tokens.
const REFRESH_PREFIX: &str = "rt.";

/// Tokens handed to the client after issue or refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token ID shared by the access and refresh token.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_id: String,
    /// Signed access token.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_token: String,
    /// Access token expiration (seconds since epoch).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub expires_at: i64,
    /// Refresh token derived from the token ID.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    /// Refresh token expiration (seconds since epoch).
    #[serde(rename = "refresh_expires", default, skip_serializing_if = "is_zero")]
    pub refresh_expires_at: i64,
}

impl TokenInfo {
    /// Returns the token ID.
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    /// Returns the access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the access token expiration.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Returns the refresh token.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Returns the refresh token expiration.
    pub fn refresh_expires_at(&self) -> i64 {
        self.refresh_expires_at
    }

    /// Encodes the result as JSON.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Refresh token for `token_id`.
///
/// A fixed derivation, not a signature: it names the session but proves
/// nothing on its own. Refresh still verifies the signed token.
pub fn refresh_token_for(token_id: &str) -> String {
    format!("{REFRESH_PREFIX}{}", URL_SAFE_NO_PAD.encode(token_id))
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_is_deterministic() {
        assert_eq!(refresh_token_for("abc"), refresh_token_for("abc"));
        assert_ne!(refresh_token_for("abc"), refresh_token_for("abd"));
        assert_eq!(refresh_token_for("abc"), "rt.YWJj");
    }

    #[test]
    fn test_json_field_names() {
        let info = TokenInfo {
            token_id: "id".to_string(),
            access_token: "a.b.c".to_string(),
            expires_at: 10,
            refresh_token: refresh_token_for("id"),
            refresh_expires_at: 20,
        };
        let value: serde_json::Value = serde_json::from_str(&info.to_json().unwrap()).unwrap();
        assert_eq!(value["token_id"], "id");
        assert_eq!(value["access_token"], "a.b.c");
        assert_eq!(value["expires_at"], 10);
        assert_eq!(value["refresh_token"], "rt.aWQ");
        assert_eq!(value["refresh_expires"], 20);
    }

    #[test]
    fn test_empty_fields_omitted() {
        let json = TokenInfo::default().to_json().unwrap();
        assert_eq!(json, "{}");
    }
}
