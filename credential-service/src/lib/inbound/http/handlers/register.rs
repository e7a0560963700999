use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::credential::models::RegisterCommand;
use crate::domain::credential::ports::AuthFlow;
use crate::domain::credential::ports::CredentialStore;
use crate::inbound::http::router::AppState;

/// Register a new credential.
///
/// The response carries identity only; registration never issues tokens.
pub async fn register<S: CredentialStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let command = RegisterCommand::new(body.username, body.password, body.confirm_password)
        .map_err(ApiError::from)?;

    let registered = state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        RegisterResponseData {
            user_id: registered.credential_id.to_string(),
            username: registered.username.to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    username: String,
    password: String,
    confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user_id: String,
    pub username: String,
}
