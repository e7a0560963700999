use std::sync::Arc;
use std::time::Duration;

use auth::JwtHandler;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_credential::delete_credential;
use super::handlers::list_credentials::list_credentials;
use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::authorization::models::PermissionSet;
use crate::domain::credential::ports::CredentialStore;
use crate::domain::credential::service::AuthService;

/// Shared application state.
///
/// Generic over the credential store so the same router serves the
/// Postgres adapter in production and the in-memory adapter in tests.
pub struct AppState<S: CredentialStore> {
    pub auth_service: Arc<AuthService<S>>,
    pub token_verifier: Arc<JwtHandler>,
    pub permissions: Arc<PermissionSet>,
}

impl<S: CredentialStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            token_verifier: Arc::clone(&self.token_verifier),
            permissions: Arc::clone(&self.permissions),
        }
    }
}

pub fn create_router<S: CredentialStore>(
    auth_service: Arc<AuthService<S>>,
    token_verifier: Arc<JwtHandler>,
    permissions: Arc<PermissionSet>,
) -> Router {
    let state = AppState {
        auth_service,
        token_verifier,
        permissions,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login::<S>))
        .route("/api/auth/register", post(register::<S>))
        .route("/api/auth/refresh", post(refresh::<S>));

    let admin_routes = Router::new()
        .route("/api/admin/credentials", get(list_credentials::<S>))
        .route("/api/admin/credentials/:id", delete(delete_credential::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
