use std::sync::Arc;

use auth::JwtHandler;
use auth::TokenIssuer;
use credential_service::domain::authorization::AccessRight;
use credential_service::domain::authorization::PermissionSet;
use credential_service::domain::authorization::Privilege;
use credential_service::domain::authorization::Role;
use credential_service::domain::credential::models::CredentialId;
use credential_service::domain::credential::service::AuthService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::InMemoryCredentialStore;
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"integration_test_secret_32_bytes!!";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryCredentialStore>,
    pub api_client: reqwest::Client,
}

/// Roles seeded into every test app: an auditor allowed to read and delete
/// credentials, and a manager with privileges over an unrelated aggregate.
pub fn default_roles() -> Vec<Role> {
    vec![
        Role {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            privileges: vec![
                Privilege::new("Credentials", AccessRight::Read),
                Privilege::new("Credentials", AccessRight::Delete),
            ],
        },
        Role {
            id: Uuid::new_v4(),
            name: "Manager".to_string(),
            privileges: vec![
                Privilege::new("Events", AccessRight::Read),
                Privilege::new("Events", AccessRight::Update),
            ],
        },
    ]
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let roles = default_roles();

        let store = Arc::new(InMemoryCredentialStore::new());
        for role in roles.clone() {
            store.insert_role(role).await;
        }

        let permissions = Arc::new(PermissionSet::new(roles));
        let token_issuer = TokenIssuer::new(TEST_SECRET, 15);
        let token_verifier = Arc::new(JwtHandler::new(TEST_SECRET));
        let auth_service = Arc::new(AuthService::new(Arc::clone(&store), token_issuer));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(auth_service, token_verifier, permissions);
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server crashed");
        });

        Self {
            address,
            store,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "confirm_password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post("/api/auth/refresh")
            .json(&serde_json::json!({
                "refresh_token": refresh_token,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a user, attach a role out of band, and log in. Returns the
    /// access token.
    pub async fn access_token_with_role(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> String {
        let response = self.register(username, password).await;
        assert!(response.status().is_success(), "registration failed");
        let body: serde_json::Value = response.json().await.unwrap();
        let user_id = CredentialId::from_string(body["data"]["user_id"].as_str().unwrap()).unwrap();

        assert!(
            self.store.assign_role(&user_id, role).await,
            "unknown role {role}"
        );

        let response = self.login(username, password).await;
        assert!(response.status().is_success(), "login failed");
        let body: serde_json::Value = response.json().await.unwrap();
        body["data"]["access_token"].as_str().unwrap().to_string()
    }
}
