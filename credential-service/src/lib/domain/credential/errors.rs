use thiserror::Error;

/// Error for CredentialId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for password policy failures at registration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Top-level error for authentication flow operations.
///
/// The first four variants are expected business outcomes returned to the
/// caller and mapped to 4xx responses; `CorruptCredential` and
/// `StoreUnavailable` are operational failures that the service logs at
/// error severity.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Wrong username/password combination. Deliberately generic: the same
    /// value is returned whether the username exists or not.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Unknown, superseded, or forged refresh token. The store holds only
    /// the current value, so these cases are indistinguishable.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Stored hash or salt is malformed: a data-integrity failure, not a
    /// wrong password.
    #[error("Corrupt credential record: {0}")]
    CorruptCredential(String),

    /// Transient persistence failure, safe for the caller to retry.
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Weak password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Invalid credential ID: {0}")]
    InvalidCredentialId(#[from] CredentialIdError),

    // Infrastructure errors
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        AuthError::Unknown(err.to_string())
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        match err {
            auth::PasswordError::CorruptDigest(msg) => AuthError::CorruptCredential(msg),
            auth::PasswordError::HashingFailed(msg) => AuthError::Unknown(msg),
        }
    }
}
