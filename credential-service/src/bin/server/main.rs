use std::sync::Arc;
use std::time::Duration;

use auth::JwtHandler;
use auth::TokenIssuer;
use credential_service::config::Config;
use credential_service::domain::authorization::PermissionSet;
use credential_service::domain::credential::ports::CredentialStore;
use credential_service::domain::credential::service::AuthService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "credential-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_ttl_minutes = config.token.access_ttl_minutes,
        db_acquire_timeout_seconds = config.database.acquire_timeout_seconds,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let store = Arc::new(PostgresCredentialStore::new(pg_pool));

    // Role/privilege graph is administered out of band; read it once and
    // serve authorization checks from memory.
    let roles = store.load_roles().await?;
    tracing::info!(role_count = roles.len(), "Authorization roles loaded");
    let permissions = Arc::new(PermissionSet::new(roles));

    let token_issuer = TokenIssuer::new(
        config.token.secret.as_bytes(),
        config.token.access_ttl_minutes,
    );
    let token_verifier = Arc::new(JwtHandler::new(config.token.secret.as_bytes()));
    let auth_service = Arc::new(AuthService::new(Arc::clone(&store), token_issuer));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, token_verifier, permissions);
    axum::serve(http_listener, application).await?;

    Ok(())
}
