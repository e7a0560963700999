use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::LoginOutcome;
use crate::domain::credential::models::RegisterCommand;
use crate::domain::credential::models::RegisteredCredential;
use crate::domain::credential::models::TokenPair;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::AuthFlow;
use crate::domain::credential::ports::CredentialStore;

/// Domain service implementing the authentication flow.
///
/// Every attempt runs the same state machine: submitted credentials are
/// either verified and end in issued tokens, or rejected. Nothing partial
/// is persisted; the only write on the success path is the atomic
/// refresh-token replacement.
pub struct AuthService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

impl<S> AuthService<S>
where
    S: CredentialStore,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `token_issuer` - Issuer configured with the signing secret and TTL
    pub fn new(store: Arc<S>, token_issuer: TokenIssuer) -> Self {
        Self {
            store,
            password_hasher: PasswordHasher::new(),
            token_issuer,
        }
    }

    /// Administrative listing. The soft-delete bypass is an explicit
    /// argument so the audit path is visible at the call site.
    pub async fn list_credentials(
        &self,
        include_deleted: bool,
    ) -> Result<Vec<Credential>, AuthError> {
        self.store.list_all(include_deleted).await
    }

    /// Soft-delete a credential; its refresh token dies with it.
    ///
    /// # Returns
    /// True if an active credential was removed, false if none matched
    pub async fn remove_credential(&self, id: &CredentialId) -> Result<bool, AuthError> {
        self.store.mark_deleted(id).await
    }

    fn verify_password(&self, credential: &Credential, password: &str) -> Result<bool, AuthError> {
        match self
            .password_hasher
            .verify(password, &credential.password_hash, &credential.salt)
        {
            Ok(matched) => Ok(matched),
            Err(e) => {
                let err = AuthError::from(e);
                tracing::error!(
                    credential_id = %credential.id,
                    error = %err,
                    "Credential record failed integrity check"
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<S> AuthFlow for AuthService<S>
where
    S: CredentialStore,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError> {
        // A malformed username gets the same generic rejection as a wrong
        // password so callers cannot probe the username policy either.
        let username = match Username::new(command.username) {
            Ok(username) => username,
            Err(_) => return Err(AuthError::InvalidCredentials),
        };

        let credential = self
            .store
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(&credential, &command.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let roles = self.store.roles_for(&credential.id).await?;
        let access_token =
            self.token_issuer
                .issue_access_token(credential.id, username.as_str(), roles.clone())?;
        let refresh_token = self.token_issuer.issue_refresh_token();

        // Unconditional replacement: a login always rotates the slot.
        let replaced = self
            .store
            .replace_refresh_token(&credential.id, None, &refresh_token)
            .await?;
        if !replaced {
            // The credential was deleted between lookup and rotation.
            return Err(AuthError::InvalidCredentials);
        }

        Ok(LoginOutcome {
            credential_id: credential.id,
            username,
            tokens: TokenPair {
                access_token,
                refresh_token,
            },
            roles,
        })
    }

    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<RegisteredCredential, AuthError> {
        let digest = self.password_hasher.hash(command.password.as_str())?;

        let credential = Credential {
            id: CredentialId::new(),
            username: command.username,
            password_hash: digest.hash,
            salt: digest.salt,
            refresh_token: None,
            is_deleted: false,
            created_at: Utc::now(),
        };

        let created = self.store.create(credential).await?;

        Ok(RegisteredCredential {
            credential_id: created.id,
            username: created.username,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let credential = self
            .store
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let roles = self.store.roles_for(&credential.id).await?;
        let access_token = self.token_issuer.issue_access_token(
            credential.id,
            credential.username.as_str(),
            roles,
        )?;
        let new_refresh_token = self.token_issuer.issue_refresh_token();

        // Compare-and-swap on the presented token: of two concurrent
        // exchanges, only the first write lands and the loser's token is
        // already superseded.
        let rotated = self
            .store
            .replace_refresh_token(&credential.id, Some(refresh_token), &new_refresh_token)
            .await?;
        if !rotated {
            return Err(AuthError::InvalidRefreshToken);
        }

        Ok(TokenPair {
            access_token,
            refresh_token: new_refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::authorization::models::Role;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn create(&self, credential: Credential) -> Result<Credential, AuthError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Credential>, AuthError>;
            async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Credential>, AuthError>;
            async fn replace_refresh_token<'a>(
                &self,
                id: &CredentialId,
                expected: Option<&'a str>,
                new_token: &str,
            ) -> Result<bool, AuthError>;
            async fn roles_for(&self, id: &CredentialId) -> Result<Vec<String>, AuthError>;
            async fn list_all(&self, include_deleted: bool) -> Result<Vec<Credential>, AuthError>;
            async fn mark_deleted(&self, id: &CredentialId) -> Result<bool, AuthError>;
            async fn load_roles(&self) -> Result<Vec<Role>, AuthError>;
        }
    }

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn service(store: MockTestCredentialStore) -> AuthService<MockTestCredentialStore> {
        AuthService::new(Arc::new(store), TokenIssuer::new(SECRET, 15))
    }

    fn stored_credential(username: &str, password: &str) -> Credential {
        let digest = PasswordHasher::new().hash(password).unwrap();
        Credential {
            id: CredentialId::new(),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: digest.hash,
            salt: digest.salt,
            refresh_token: None,
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_login_success_issues_tokens_and_rotates() {
        let credential = stored_credential("alice", "secret1");
        let credential_id = credential.id;

        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .withf(|u| u.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(Some(credential.clone())));
        store
            .expect_roles_for()
            .withf(move |id| *id == credential_id)
            .times(1)
            .returning(|_| Ok(vec!["Manager".to_string()]));
        store
            .expect_replace_refresh_token()
            .withf(move |id, expected, _| *id == credential_id && expected.is_none())
            .times(1)
            .returning(|_, _, _| Ok(true));

        let outcome = service(store)
            .login(LoginCommand {
                username: "alice".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .expect("login should succeed");

        assert_eq!(outcome.credential_id, credential_id);
        assert_eq!(outcome.username.as_str(), "alice");
        assert_eq!(outcome.roles, vec!["Manager"]);
        assert!(!outcome.tokens.access_token.is_empty());
        assert_eq!(outcome.tokens.refresh_token.len(), 64);
    }

    #[tokio::test]
    async fn test_login_rejections_are_indistinguishable() {
        // Unknown username
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        let unknown_user = service(store)
            .login(LoginCommand {
                username: "nonexistent".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();

        // Existing username, wrong password
        let credential = stored_credential("alice", "secret1");
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(credential.clone())));
        let wrong_password = service(store)
            .login(LoginCommand {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_login_malformed_username_never_touches_store() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_by_username().times(0);

        let result = service(store)
            .login(LoginCommand {
                username: "a".to_string(),
                password: "secret1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_corrupt_digest_is_not_a_rejection() {
        let mut credential = stored_credential("alice", "secret1");
        credential.salt = String::new();

        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(credential.clone())));

        let result = service(store)
            .login(LoginCommand {
                username: "alice".to_string(),
                password: "secret1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::CorruptCredential(_))));
    }

    #[tokio::test]
    async fn test_register_creates_credential_without_tokens() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_create()
            .withf(|credential| {
                credential.username.as_str() == "alice"
                    && credential.password_hash.starts_with("$argon2")
                    && !credential.salt.is_empty()
                    && credential.refresh_token.is_none()
                    && !credential.is_deleted
            })
            .times(1)
            .returning(|credential| Ok(credential));

        let command = RegisterCommand::new(
            "alice".to_string(),
            "secret1".to_string(),
            "secret1".to_string(),
        )
        .unwrap();

        let registered = service(store)
            .register(command)
            .await
            .expect("registration should succeed");

        assert_eq!(registered.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut store = MockTestCredentialStore::new();
        store.expect_create().times(1).returning(|credential| {
            Err(AuthError::DuplicateUsername(
                credential.username.as_str().to_string(),
            ))
        });

        let command = RegisterCommand::new(
            "alice".to_string(),
            "secret1".to_string(),
            "secret1".to_string(),
        )
        .unwrap();

        let result = service(store).register(command).await;
        assert!(matches!(result, Err(AuthError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_refresh_rotates_to_a_new_token() {
        let credential = stored_credential("alice", "secret1");
        let credential_id = credential.id;

        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_refresh_token()
            .withf(|token| token == "old-token")
            .times(1)
            .returning(move |_| Ok(Some(credential.clone())));
        store
            .expect_roles_for()
            .times(1)
            .returning(|_| Ok(vec![]));
        store
            .expect_replace_refresh_token()
            .withf(move |id, expected, new_token| {
                *id == credential_id && *expected == Some("old-token") && new_token != "old-token"
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let pair = service(store)
            .refresh("old-token")
            .await
            .expect("refresh should succeed");

        assert_ne!(pair.refresh_token, "old-token");
        assert!(!pair.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_unknown_token() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_refresh_token()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(store).refresh("never-issued").await;
        assert!(matches!(result, Err(AuthError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_refresh_lost_race_maps_to_invalid_token() {
        let credential = stored_credential("alice", "secret1");

        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_refresh_token()
            .times(1)
            .returning(move |_| Ok(Some(credential.clone())));
        store
            .expect_roles_for()
            .times(1)
            .returning(|_| Ok(vec![]));
        // Another exchange rotated the slot after our read.
        store
            .expect_replace_refresh_token()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let result = service(store).refresh("stale-token").await;
        assert!(matches!(result, Err(AuthError::InvalidRefreshToken)));
    }
}
