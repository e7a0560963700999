use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::authorization::models::Role;
use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::CredentialStore;

/// In-process credential store.
///
/// Same contract as the Postgres adapter: the whole mutation runs under a
/// single write lock, so create-uniqueness and the refresh-token
/// compare-and-swap are atomic. Used by the integration test harness and
/// for local runs without a database.
pub struct InMemoryCredentialStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    credentials: HashMap<Uuid, Credential>,
    roles: Vec<Role>,
    memberships: HashSet<(Uuid, Uuid)>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Seed a role. Role administration is out of band in production; this
    /// stands in for it.
    pub async fn insert_role(&self, role: Role) {
        self.inner.write().await.roles.push(role);
    }

    /// Attach a role to a credential by role name.
    ///
    /// # Returns
    /// True if the role exists and the membership was recorded
    pub async fn assign_role(&self, credential_id: &CredentialId, role_name: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.roles.iter().find(|r| r.name == role_name) {
            Some(role) => {
                let role_id = role.id;
                inner.memberships.insert((credential_id.0, role_id));
                true
            }
            None => false,
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, credential: Credential) -> Result<Credential, AuthError> {
        let mut inner = self.inner.write().await;

        let taken = inner
            .credentials
            .values()
            .any(|c| !c.is_deleted && c.username == credential.username);
        if taken {
            return Err(AuthError::DuplicateUsername(
                credential.username.as_str().to_string(),
            ));
        }

        inner.credentials.insert(credential.id.0, credential.clone());
        Ok(credential)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Credential>, AuthError> {
        let inner = self.inner.read().await;
        Ok(inner
            .credentials
            .values()
            .find(|c| !c.is_deleted && c.username == *username)
            .cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Credential>, AuthError> {
        let inner = self.inner.read().await;
        Ok(inner
            .credentials
            .values()
            .find(|c| !c.is_deleted && c.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn replace_refresh_token<'a>(
        &self,
        id: &CredentialId,
        expected: Option<&'a str>,
        new_token: &str,
    ) -> Result<bool, AuthError> {
        let mut inner = self.inner.write().await;

        let Some(credential) = inner.credentials.get_mut(&id.0) else {
            return Ok(false);
        };
        if credential.is_deleted {
            return Ok(false);
        }
        if let Some(expected) = expected {
            if credential.refresh_token.as_deref() != Some(expected) {
                return Ok(false);
            }
        }

        credential.refresh_token = Some(new_token.to_string());
        Ok(true)
    }

    async fn roles_for(&self, id: &CredentialId) -> Result<Vec<String>, AuthError> {
        let inner = self.inner.read().await;
        let mut names: Vec<String> = inner
            .roles
            .iter()
            .filter(|role| inner.memberships.contains(&(id.0, role.id)))
            .map(|role| role.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn list_all(&self, include_deleted: bool) -> Result<Vec<Credential>, AuthError> {
        let inner = self.inner.read().await;
        let mut credentials: Vec<Credential> = inner
            .credentials
            .values()
            .filter(|c| include_deleted || !c.is_deleted)
            .cloned()
            .collect();
        credentials.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(credentials)
    }

    async fn mark_deleted(&self, id: &CredentialId) -> Result<bool, AuthError> {
        let mut inner = self.inner.write().await;
        match inner.credentials.get_mut(&id.0) {
            Some(credential) if !credential.is_deleted => {
                credential.is_deleted = true;
                credential.refresh_token = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn load_roles(&self) -> Result<Vec<Role>, AuthError> {
        Ok(self.inner.read().await.roles.clone())
    }
}
