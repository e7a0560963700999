use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::authorization::models::Privilege;
use crate::domain::authorization::models::Role;
use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::CredentialStore;

/// Partial unique index over active usernames; see migrations.
const USERNAME_UNIQUE_INDEX: &str = "credentials_username_active_key";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    username: String,
    password_hash: String,
    salt: String,
    refresh_token: Option<String>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = AuthError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        // A stored username that no longer parses is record corruption,
        // not a caller error.
        let username = Username::new(row.username)
            .map_err(|e| AuthError::CorruptCredential(e.to_string()))?;
        Ok(Credential {
            id: CredentialId(row.id),
            username,
            password_hash: row.password_hash,
            salt: row.salt,
            refresh_token: row.refresh_token,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
        })
    }
}

/// Transient persistence failures are operational errors: log at error
/// severity and surface as retryable.
fn store_error(e: sqlx::Error) -> AuthError {
    tracing::error!(error = %e, "Credential store operation failed");
    AuthError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, credential: Credential) -> Result<Credential, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, username, password_hash, salt, refresh_token, is_deleted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credential.id.0)
        .bind(credential.username.as_str())
        .bind(&credential.password_hash)
        .bind(&credential.salt)
        .bind(&credential.refresh_token)
        .bind(credential.is_deleted)
        .bind(credential.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(USERNAME_UNIQUE_INDEX)
                {
                    return AuthError::DuplicateUsername(
                        credential.username.as_str().to_string(),
                    );
                }
            }
            store_error(e)
        })?;

        Ok(credential)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Credential>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_hash, salt, refresh_token, is_deleted, created_at
            FROM credentials
            WHERE username = $1 AND NOT is_deleted
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Credential::try_from).transpose()
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Credential>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_hash, salt, refresh_token, is_deleted, created_at
            FROM credentials
            WHERE refresh_token = $1 AND NOT is_deleted
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Credential::try_from).transpose()
    }

    async fn replace_refresh_token<'a>(
        &self,
        id: &CredentialId,
        expected: Option<&'a str>,
        new_token: &str,
    ) -> Result<bool, AuthError> {
        // Single conditional UPDATE: the compare and the swap execute as
        // one atomic statement, so racing callers cannot interleave.
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET refresh_token = $3
            WHERE id = $1
              AND NOT is_deleted
              AND ($2::TEXT IS NULL OR refresh_token = $2)
            "#,
        )
        .bind(id.0)
        .bind(expected)
        .bind(new_token)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn roles_for(&self, id: &CredentialId) -> Result<Vec<String>, AuthError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.name
            FROM roles r
            JOIN credential_roles cr ON cr.role_id = r.id
            WHERE cr.credential_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn list_all(&self, include_deleted: bool) -> Result<Vec<Credential>, AuthError> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_hash, salt, refresh_token, is_deleted, created_at
            FROM credentials
            WHERE $1 OR NOT is_deleted
            ORDER BY created_at DESC
            "#,
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(Credential::try_from).collect()
    }

    async fn mark_deleted(&self, id: &CredentialId) -> Result<bool, AuthError> {
        // Clearing the slot revokes any outstanding refresh token with
        // the account.
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET is_deleted = TRUE, refresh_token = NULL
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn load_roles(&self) -> Result<Vec<Role>, AuthError> {
        let rows = sqlx::query_as::<_, (Uuid, String, Option<String>, Option<String>)>(
            r#"
            SELECT r.id, r.name, p.aggregate, p.access_right
            FROM roles r
            LEFT JOIN privileges p ON p.role_id = r.id
            ORDER BY r.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        let mut roles: HashMap<Uuid, Role> = HashMap::new();
        for (id, name, aggregate, access_right) in rows {
            let role = roles.entry(id).or_insert_with(|| Role {
                id,
                name,
                privileges: Vec::new(),
            });
            if let (Some(aggregate), Some(access_right)) = (aggregate, access_right) {
                let right = access_right
                    .parse()
                    .map_err(AuthError::CorruptCredential)?;
                role.privileges.push(Privilege::new(aggregate, right));
            }
        }

        Ok(roles.into_values().collect())
    }
}
