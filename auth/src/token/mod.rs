pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;
pub mod refresh;

pub use claims::AccessTokenClaims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use issuer::TokenIssuer;
pub use refresh::RefreshTokenGenerator;
