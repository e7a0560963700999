use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;

/// Raw entropy per refresh token; 256 bits, well above the 128-bit floor.
const TOKEN_BYTES: usize = 32;

/// Generator for opaque refresh tokens.
///
/// Tokens are unguessable random strings carrying no identity information.
/// Identity is recovered by looking the token up in the credential store.
pub struct RefreshTokenGenerator;

impl RefreshTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh opaque token from the OS CSPRNG, hex-encoded.
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

impl Default for RefreshTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
