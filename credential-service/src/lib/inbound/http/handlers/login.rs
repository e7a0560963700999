use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::ports::AuthFlow;
use crate::domain::credential::ports::CredentialStore;
use crate::inbound::http::router::AppState;

/// Authenticate a username/password pair and return a token pair.
///
/// All rejections surface as the same generic 401: whether the username
/// exists is deliberately not revealed.
pub async fn login<S: CredentialStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let outcome = state
        .auth_service
        .login(LoginCommand {
            username: body.username,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user_id: outcome.credential_id.to_string(),
            username: outcome.username.to_string(),
            access_token: outcome.tokens.access_token,
            refresh_token: outcome.tokens.refresh_token,
            roles: outcome.roles,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user_id: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub roles: Vec<String>,
}
