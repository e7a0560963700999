//! Authentication primitives library
//!
//! Provides the reusable building blocks of the credential core:
//! - Password hashing (Argon2id) with an explicit hash+salt digest pair
//! - Signed access tokens (JWT, HS256) with a fixed claim shape
//! - Opaque refresh token generation
//!
//! The orchestration of login, registration, and refresh-token rotation
//! lives in the service layer; this crate is pure functions over inputs.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &digest.hash, &digest.salt).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", 15);
//!
//! let access = issuer
//!     .issue_access_token("cred-1", "alice", vec!["Manager".to_string()])
//!     .unwrap();
//! let claims = issuer.verify_access_token(&access).unwrap();
//! assert_eq!(claims.username, "alice");
//!
//! let refresh = issuer.issue_refresh_token();
//! assert_eq!(refresh.len(), 64);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordDigest;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessTokenClaims;
pub use token::JwtError;
pub use token::JwtHandler;
pub use token::RefreshTokenGenerator;
pub use token::TokenIssuer;
