use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as HashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Salted password digest as persisted alongside a credential.
///
/// `hash` is the full PHC string (algorithm, parameters, salt, and hash);
/// `salt` is the same salt stored separately so reads can cross-check the
/// record for corruption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: String,
    pub salt: String,
}

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher configured with secure defaults.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with a freshly generated random 128-bit salt; hashing
    /// the same password twice yields different salts and different hashes.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Digest pair of PHC string hash and base64 salt
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(PasswordDigest {
            hash,
            salt: salt.as_str().to_string(),
        })
    }

    /// Verify a password attempt against a stored hash and salt.
    ///
    /// Recomputes the digest with the stored salt and compares in constant
    /// time (delegated to the Argon2 verifier).
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    /// * `salt` - Stored salt, which must match the salt embedded in `hash`
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `CorruptDigest` - Hash or salt is empty, malformed, or inconsistent
    pub fn verify(&self, password: &str, hash: &str, salt: &str) -> Result<bool, PasswordError> {
        if hash.is_empty() {
            return Err(PasswordError::CorruptDigest(
                "empty password hash".to_string(),
            ));
        }
        if salt.is_empty() {
            return Err(PasswordError::CorruptDigest("empty salt".to_string()));
        }

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::CorruptDigest(format!("invalid password hash: {}", e)))?;

        let embedded_salt = parsed_hash.salt.ok_or_else(|| {
            PasswordError::CorruptDigest("password hash carries no salt".to_string())
        })?;
        if embedded_salt.as_str() != salt {
            return Err(PasswordError::CorruptDigest(
                "stored salt does not match password hash".to_string(),
            ));
        }

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::CorruptDigest(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
