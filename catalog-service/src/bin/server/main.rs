use std::str::FromStr;
use std::sync::Arc;

use auth::Authenticator;
use catalog_service::config::Config;
use catalog_service::domain::session::models::Username;
use catalog_service::domain::session::service::SessionService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::outbound::repositories::SqliteCredentialRepository;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "catalog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        access_token_hours = config.jwt.expiration_hours,
        refresh_token_days = config.session.refresh_expiration_days,
        "Configuration loaded"
    );

    let connect_options =
        SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "sqlite",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes(), config.jwt.issuer.clone())
            .with_token_lifetime(config.access_token_lifetime()),
    );
    let credential_repository = Arc::new(SqliteCredentialRepository::new(pool));

    let session_service = Arc::new(SessionService::new(
        credential_repository,
        Arc::clone(&authenticator),
        config.session_policy(),
    ));

    if let Some(seed) = &config.seed {
        let username = Username::new(seed.admin_username.clone())?;
        match session_service
            .seed_credential(username, seed.admin_password.clone())
            .await?
        {
            Some(record) => tracing::info!(user_id = %record.id, username = %record.username, "Seeded admin credential"),
            None => tracing::debug!(username = %seed.admin_username, "Admin credential already present"),
        }
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        session_service,
        authenticator,
        &config.server.allowed_origins,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
