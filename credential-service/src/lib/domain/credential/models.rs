use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::errors::CredentialIdError;
use crate::domain::credential::errors::PasswordPolicyError;
use crate::domain::credential::errors::UsernameError;

/// Credential aggregate entity.
///
/// Holds everything needed to authenticate one identity: the salted
/// password digest, the single active refresh-token slot, and the
/// soft-delete flag. Role objects are referenced by membership, not owned.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: CredentialId,
    pub username: Username,
    pub password_hash: String,
    pub salt: String,
    pub refresh_token: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Credential unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub Uuid);

impl CredentialId {
    /// Generate a new random credential ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a credential ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, CredentialIdError> {
        Uuid::parse_str(s)
            .map(CredentialId)
            .map_err(|e| CredentialIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric,
/// underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration.
///
/// Enforces the minimum-length policy before the password ever reaches the
/// hasher. Intentionally has no Display impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaintextPassword(String);

impl PlaintextPassword {
    const MIN_LENGTH: usize = 6;

    /// Create a policy-checked plaintext password.
    ///
    /// # Errors
    /// * `TooShort` - Password shorter than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.len();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new credential with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: PlaintextPassword,
}

impl RegisterCommand {
    /// Construct a registration command, rejecting mismatched confirmation
    /// before any policy checks run.
    ///
    /// # Errors
    /// * `PasswordMismatch` - Password and confirmation differ
    /// * `InvalidUsername` - Username fails the length/charset policy
    /// * `WeakPassword` - Password fails the length policy
    pub fn new(username: String, password: String, confirm_password: String) -> Result<Self, AuthError> {
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        let username = Username::new(username)?;
        let password = PlaintextPassword::new(password)?;
        Ok(Self { username, password })
    }
}

/// Command to authenticate an existing credential.
///
/// The username is kept raw on purpose: a malformed username must produce
/// the same generic rejection as a wrong password.
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Freshly minted access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Terminal success state of a login attempt.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub credential_id: CredentialId,
    pub username: Username,
    pub tokens: TokenPair,
    pub roles: Vec<String>,
}

/// Result of a successful registration. Carries identity only: no tokens
/// are issued, registration never auto-logs-in.
#[derive(Debug, Clone)]
pub struct RegisteredCredential {
    pub credential_id: CredentialId,
    pub username: Username,
}
