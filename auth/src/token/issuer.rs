use super::claims::AccessTokenClaims;
use super::errors::JwtError;
use super::handler::JwtHandler;
use super::refresh::RefreshTokenGenerator;

/// Mints short-lived signed access tokens and opaque refresh tokens.
///
/// The signing secret is supplied at construction; a missing or unreadable
/// secret is a configuration failure at startup, never a per-request error.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    refresh_generator: RefreshTokenGenerator,
    access_ttl_minutes: i64,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Shared secret for signing access tokens
    /// * `access_ttl_minutes` - Lifetime of issued access tokens
    pub fn new(secret: &[u8], access_ttl_minutes: i64) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            refresh_generator: RefreshTokenGenerator::new(),
            access_ttl_minutes,
        }
    }

    /// Issue a signed access token for a credential.
    ///
    /// Claims carry the subject id, username, and current role names, with
    /// `iat` set to now and `exp` set to now plus the configured TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_access_token(
        &self,
        subject: impl ToString,
        username: &str,
        roles: Vec<String>,
    ) -> Result<String, JwtError> {
        let claims =
            AccessTokenClaims::new(subject, username.to_string(), roles, self.access_ttl_minutes);
        self.jwt_handler.encode(&claims)
    }

    /// Issue a fresh opaque refresh token.
    pub fn issue_refresh_token(&self) -> String {
        self.refresh_generator.generate()
    }

    /// Validate and decode an access token issued with this issuer's secret.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `DecodingFailed` - Signature is invalid or token is malformed
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
