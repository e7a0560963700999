use async_trait::async_trait;

use crate::domain::authorization::models::Role;
use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::LoginOutcome;
use crate::domain::credential::models::RegisterCommand;
use crate::domain::credential::models::RegisteredCredential;
use crate::domain::credential::models::TokenPair;
use crate::domain::credential::models::Username;

/// Port for the authentication flow: login, registration, and
/// refresh-token exchange. Each call is a stateless request/response
/// operation; no intermediate state survives between requests.
#[async_trait]
pub trait AuthFlow: Send + Sync + 'static {
    /// Authenticate a username/password pair.
    ///
    /// On success, issues an access/refresh pair and rotates the stored
    /// refresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (generic)
    /// * `CorruptCredential` - Stored digest is malformed
    /// * `StoreUnavailable` - Transient persistence failure
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError>;

    /// Register a new credential.
    ///
    /// Returns identity only: no tokens are issued.
    ///
    /// # Errors
    /// * `DuplicateUsername` - An active credential already holds the name
    /// * `StoreUnavailable` - Transient persistence failure
    async fn register(&self, command: RegisterCommand)
        -> Result<RegisteredCredential, AuthError>;

    /// Exchange a refresh token for a fresh access/refresh pair,
    /// invalidating the presented token.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Unknown, superseded, or forged token, or
    ///   a concurrent exchange won the rotation race
    /// * `StoreUnavailable` - Transient persistence failure
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
}

/// Persistence operations for the credential aggregate.
///
/// Exclusively owns credential records. Role and privilege rows are
/// referenced, not owned; they are administered by a separate surface and
/// only read here.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new credential.
    ///
    /// Uniqueness of the username among active credentials must be enforced
    /// atomically by the storage layer, not checked-then-inserted.
    ///
    /// # Errors
    /// * `DuplicateUsername` - An active credential already holds the name
    /// * `StoreUnavailable` - Transient persistence failure
    async fn create(&self, credential: Credential) -> Result<Credential, AuthError>;

    /// Look up an active credential by username. Soft-deleted rows are
    /// excluded.
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Credential>, AuthError>;

    /// Look up an active credential by its current refresh token.
    /// Soft-deleted rows are excluded.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Credential>, AuthError>;

    /// Atomically replace the refresh-token slot.
    ///
    /// When `expected` is `Some`, the write only happens if the stored
    /// token still equals it (compare-and-swap); of two racers presenting
    /// the same token, only the first succeeds. When `expected` is `None`,
    /// the slot is replaced unconditionally (login).
    ///
    /// # Returns
    /// True if the slot was replaced, false if the compare failed or the
    /// credential is missing/deleted
    async fn replace_refresh_token<'a>(
        &self,
        id: &CredentialId,
        expected: Option<&'a str>,
        new_token: &str,
    ) -> Result<bool, AuthError>;

    /// Role names held by a credential, sorted by name.
    async fn roles_for(&self, id: &CredentialId) -> Result<Vec<String>, AuthError>;

    /// List credentials for administrative audit. The soft-delete bypass is
    /// explicit at the call site: `include_deleted = false` returns active
    /// rows only.
    async fn list_all(&self, include_deleted: bool) -> Result<Vec<Credential>, AuthError>;

    /// Soft-delete a credential and clear its refresh-token slot so the
    /// account can no longer refresh.
    ///
    /// # Returns
    /// True if an active credential was marked, false if none matched
    async fn mark_deleted(&self, id: &CredentialId) -> Result<bool, AuthError>;

    /// Read all roles with their privileges, for building the permission
    /// lookup at startup.
    async fn load_roles(&self) -> Result<Vec<Role>, AuthError>;
}
