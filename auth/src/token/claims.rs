use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claim set.
///
/// The shape is a wire contract shared with collaborating services:
/// `{sub, username, roles, iat, exp}`. Every field is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Subject: credential identifier
    pub sub: String,

    /// Username at issue time
    pub username: String,

    /// Role names held by the credential at issue time
    pub roles: Vec<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessTokenClaims {
    /// Create claims for a credential with automatic expiration.
    ///
    /// # Arguments
    /// * `subject` - Credential identifier
    /// * `username` - Username
    /// * `roles` - Role names held by the credential
    /// * `ttl_minutes` - Minutes until the token expires
    pub fn new(
        subject: impl ToString,
        username: String,
        roles: Vec<String>,
        ttl_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::minutes(ttl_minutes);

        Self {
            sub: subject.to_string(),
            username,
            roles,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if the token is expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims_window() {
        let claims = AccessTokenClaims::new("cred-1", "alice".to_string(), vec![], 15);

        assert_eq!(claims.sub, "cred-1");
        assert_eq!(claims.username, "alice");
        assert!(claims.roles.is_empty());
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_roles_preserved_in_order() {
        let claims = AccessTokenClaims::new(
            "cred-1",
            "alice".to_string(),
            vec!["Admin".to_string(), "Manager".to_string()],
            5,
        );
        assert_eq!(claims.roles, vec!["Admin", "Manager"]);
    }

    #[test]
    fn test_is_expired() {
        let mut claims = AccessTokenClaims::new("cred-1", "alice".to_string(), vec![], 1);
        claims.exp = 1000;

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_claim_shape_on_the_wire() {
        let mut claims = AccessTokenClaims::new(
            "cred-1",
            "alice".to_string(),
            vec!["Manager".to_string()],
            5,
        );
        claims.iat = 100;
        claims.exp = 400;

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sub": "cred-1",
                "username": "alice",
                "roles": ["Manager"],
                "iat": 100,
                "exp": 400,
            })
        );
    }
}
