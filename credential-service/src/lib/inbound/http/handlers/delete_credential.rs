use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CREDENTIALS_AGGREGATE;
use crate::domain::authorization::models::AccessRight;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::ports::CredentialStore;
use crate::inbound::http::middleware::AuthenticatedCaller;
use crate::inbound::http::router::AppState;

/// Soft-delete a credential.
///
/// The record is flagged, never removed; its refresh token is revoked with
/// it. Requires the (Credentials, Delete) privilege.
pub async fn delete_credential<S: CredentialStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<AuthenticatedCaller>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DeleteCredentialResponseData>, ApiError> {
    if !state
        .permissions
        .is_permitted(&caller.roles, CREDENTIALS_AGGREGATE, AccessRight::Delete)
    {
        return Err(ApiError::Forbidden(
            "Missing privilege: Credentials/Delete".to_string(),
        ));
    }

    let credential_id = CredentialId::from_string(&id)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    let removed = state
        .auth_service
        .remove_credential(&credential_id)
        .await
        .map_err(ApiError::from)?;

    if !removed {
        return Err(ApiError::NotFound(format!(
            "No active credential with id {}",
            credential_id
        )));
    }

    Ok(ApiSuccess::new(
        StatusCode::OK,
        DeleteCredentialResponseData {
            id: credential_id.to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteCredentialResponseData {
    pub id: String,
}
