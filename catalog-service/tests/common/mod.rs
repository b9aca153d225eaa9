use std::sync::Arc;

use auth::Authenticator;
use auth::HashParams;
use catalog_service::domain::session::models::SessionPolicy;
use catalog_service::domain::session::models::Username;
use catalog_service::domain::session::service::SessionService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::outbound::repositories::SqliteCredentialRepository;
use chrono::DateTime;
use chrono::Utc;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ISSUER: &str = "catalog";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub pool: SqlitePool,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

/// Stored refresh-token columns of a user
#[derive(Debug, PartialEq, Eq)]
pub struct StoredSession {
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

impl TestApp {
    /// Spawn the application with a fresh in-memory database seeded with admin/admin
    ///
    /// Cheap Argon2 parameters keep the suite fast; verification reads them from the digest
    pub async fn spawn() -> Self {
        Self::spawn_with_password_params(HashParams {
            memory_kib: 1024,
            parallelism: 1,
            ..HashParams::default()
        })
        .await
    }

    /// Spawn the application, seeding admin/admin with the given Argon2 costs
    pub async fn spawn_with_password_params(password_params: HashParams) -> Self {
        // A single connection that never closes keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET, ISSUER).with_password_params(password_params),
        );

        let repository = Arc::new(SqliteCredentialRepository::new(pool.clone()));
        let session_service = Arc::new(SessionService::new(
            repository,
            Arc::clone(&authenticator),
            SessionPolicy::default(),
        ));

        session_service
            .seed_credential(Username::new("admin".to_string()).unwrap(), "admin".to_string())
            .await
            .expect("Failed to seed admin credential");

        let router = create_router(
            session_service,
            Arc::clone(&authenticator),
            &["http://localhost:3000".to_string()],
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            pool,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request carrying the refresh cookie.
    ///
    /// The cookie is Secure, so a cookie store would not replay it over plain http.
    pub fn post_with_refresh_cookie(&self, path: &str, refresh_token: &str) -> reqwest::RequestBuilder {
        self.post(path)
            .header(COOKIE, format!("refreshToken={}", refresh_token))
    }

    /// Log in and return the response
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Read the stored refresh-token columns for a username
    pub async fn stored_session(&self, username: &str) -> StoredSession {
        let (refresh_token, refresh_token_expires_at): (Option<String>, Option<DateTime<Utc>>) =
            sqlx::query_as(
                "SELECT refresh_token, refresh_token_expires_at FROM users WHERE username = ?",
            )
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to read stored session");

        StoredSession {
            refresh_token,
            refresh_token_expires_at,
        }
    }

    /// Overwrite the stored refresh-token expiry for a username
    pub async fn set_refresh_token_expiry(&self, username: &str, expires_at: DateTime<Utc>) {
        sqlx::query("UPDATE users SET refresh_token_expires_at = ? WHERE username = ?")
            .bind(expires_at)
            .bind(username)
            .execute(&self.pool)
            .await
            .expect("Failed to update refresh token expiry");
    }
}

/// Raw `Set-Cookie` header for the refresh token, if the response set one
pub fn refresh_set_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("refreshToken="))
        .map(str::to_string)
}

/// Value of the refresh token cookie, if the response set one
pub fn refresh_cookie_value(response: &reqwest::Response) -> Option<String> {
    refresh_set_cookie(response).map(|header| {
        header
            .trim_start_matches("refreshToken=")
            .split(';')
            .next()
            .unwrap_or_default()
            .to_string()
    })
}
