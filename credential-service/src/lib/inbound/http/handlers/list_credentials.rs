use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CREDENTIALS_AGGREGATE;
use crate::domain::authorization::models::AccessRight;
use crate::domain::credential::models::Credential;
use crate::domain::credential::ports::CredentialStore;
use crate::inbound::http::middleware::AuthenticatedCaller;
use crate::inbound::http::router::AppState;

/// Administrative audit listing.
///
/// Soft-deleted credentials are excluded unless `include_deleted=true` is
/// passed explicitly. Requires the (Credentials, Read) privilege.
pub async fn list_credentials<S: CredentialStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<AuthenticatedCaller>,
    Query(params): Query<ListCredentialsParams>,
) -> Result<ApiSuccess<ListCredentialsResponseData>, ApiError> {
    if !state
        .permissions
        .is_permitted(&caller.roles, CREDENTIALS_AGGREGATE, AccessRight::Read)
    {
        return Err(ApiError::Forbidden(
            "Missing privilege: Credentials/Read".to_string(),
        ));
    }

    let include_deleted = params.include_deleted.unwrap_or(false);
    let credentials = state
        .auth_service
        .list_credentials(include_deleted)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ListCredentialsResponseData {
            credentials: credentials.iter().map(CredentialData::from).collect(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListCredentialsParams {
    include_deleted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListCredentialsResponseData {
    pub credentials: Vec<CredentialData>,
}

/// Audit view of a credential. Secrets (hash, salt, refresh token) are
/// never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialData {
    pub id: String,
    pub username: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Credential> for CredentialData {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id.to_string(),
            username: credential.username.to_string(),
            is_deleted: credential.is_deleted,
            created_at: credential.created_at,
        }
    }
}
