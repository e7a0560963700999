use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash or salt is malformed or inconsistent. This is a data
    /// integrity failure, not a wrong password.
    #[error("Corrupt password digest: {0}")]
    CorruptDigest(String),
}
