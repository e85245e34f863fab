//! JWT claims structure carried by session tokens.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-owned identity payload copied into every token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject: the user ID.
    pub sub: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Roles granted at the time of issuance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Free-form application attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Identity {
    /// Creates an identity for the given subject.
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Adds an application attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// JWT claims payload of one issued session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID; the revocation store key. Kept across refreshes.
    pub jti: String,
    /// Identity fields, flattened into the payload.
    #[serde(flatten)]
    pub identity: Identity,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `identity` with a fresh token ID and an empty
    /// validity window. Call [`Claims::stamp`] before signing.
    pub fn new(identity: Identity) -> Self {
        Self {
            jti: Uuid::new_v4().to_string(),
            identity,
            iat: 0,
            nbf: 0,
            exp: 0,
        }
    }

    /// Returns the token ID.
    pub fn token_id(&self) -> &str {
        &self.jti
    }

    /// Returns the subject.
    pub fn subject(&self) -> &str {
        &self.identity.sub
    }

    /// Sets `iat = nbf = now` and `exp = now + lifetime`.
    pub fn stamp(&mut self, now: DateTime<Utc>, lifetime: TimeDelta) {
        self.iat = now.timestamp();
        self.nbf = self.iat;
        self.exp = (now + lifetime).timestamp();
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Checks whether this token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Time left until natural expiry; negative once expired.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> TimeDelta {
        TimeDelta::seconds(self.exp - now.timestamp())
    }
}

/// Anything that carries a user identity.
///
/// Issuance accepts any implementor and copies its identity; revocation
/// only accepts values that are [`Claims`] issued by this crate.
pub trait UserInfo: Send + Sync {
    /// The identity payload.
    fn identity(&self) -> &Identity;

    /// Token ID, when the value is bound to an issued token.
    fn token_id(&self) -> Option<&str> {
        None
    }

    /// Downcast to claims issued by this crate.
    fn as_claims(&self) -> Option<&Claims> {
        None
    }
}

impl UserInfo for Identity {
    fn identity(&self) -> &Identity {
        self
    }
}

impl UserInfo for Claims {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn token_id(&self) -> Option<&str> {
        Some(&self.jti)
    }

    fn as_claims(&self) -> Option<&Claims> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_sets_window() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut claims = Claims::new(Identity::new("u1"));
        claims.stamp(now, TimeDelta::hours(2));

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp, 1_700_000_000 + 7200);
        assert!(!claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + TimeDelta::hours(2)));
        assert_eq!(claims.remaining_ttl(now), TimeDelta::hours(2));
    }

    #[test]
    fn test_new_claims_get_unique_ids() {
        let a = Claims::new(Identity::new("u1"));
        let b = Claims::new(Identity::new("u1"));
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_identity_is_flattened() {
        let identity = Identity::new("u1")
            .with_name("Ada")
            .with_role("admin")
            .with_attribute("tenant", serde_json::json!("acme"));
        let claims = Claims {
            jti: "id-1".to_string(),
            identity: identity.clone(),
            iat: 1,
            nbf: 1,
            exp: 2,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["sub"], "u1");
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["roles"][0], "admin");
        assert_eq!(value["attributes"]["tenant"], "acme");

        let back: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(back.identity, identity);
    }

    #[test]
    fn test_only_claims_downcast() {
        let identity = Identity::new("u1");
        assert!(identity.as_claims().is_none());
        assert!(identity.token_id().is_none());

        let claims = Claims::new(identity);
        assert_eq!(claims.as_claims().map(|c| c.jti.as_str()), Some(claims.token_id()));
    }
}
