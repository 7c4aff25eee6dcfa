//!
//! EventHub REST API server.
//! Reads configuration from TOML file (~/.config/eventhub/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use eventhub::application::identity::CreateUser;
use eventhub::application::{EventService, RegistrationService, UserService};
use eventhub::domain::{RepositoryProvider, Role};
use eventhub::infrastructure::crypto::jwt::JwtConfig;
use eventhub::infrastructure::database::migrator::Migrator;
use eventhub::shared::SystemClock;
use eventhub::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("EVENTHUB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting EventHub...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "eventhub".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let clock = Arc::new(SystemClock);

    let user_service = Arc::new(UserService::new(
        repos.clone(),
        jwt_config.clone(),
        clock.clone(),
    ));
    let event_service = Arc::new(EventService::new(repos.clone(), clock.clone()));
    let registration_service = Arc::new(RegistrationService::new(repos.clone(), clock));

    // Create default admin user if no users exist
    create_default_admin(repos.as_ref(), &user_service, &app_cfg).await;

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        user_service,
        event_service,
        registration_service,
        db.clone(),
        jwt_config,
    );

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("EventHub shutdown complete");
    Ok(())
}

/// Resolve when SIGINT (or SIGTERM on unix) is received
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Create default admin user if no users exist
async fn create_default_admin(
    repos: &dyn RepositoryProvider,
    user_service: &UserService,
    app_cfg: &AppConfig,
) {
    let users_count = match repos.users().count().await {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    };

    if users_count == 0 {
        info!("Creating default admin user...");

        let result = user_service
            .create_user(CreateUser {
                username: app_cfg.admin.username.clone(),
                email: app_cfg.admin.email.clone(),
                password: app_cfg.admin.password.clone(),
                full_name: app_cfg.admin.full_name.clone(),
                roles: vec![Role::Admin],
            })
            .await;

        match result {
            Ok(user) => {
                info!("Default admin created: {}", user.email);
                warn!("Please change the admin password immediately!");
            }
            Err(e) => {
                error!("Failed to create admin user: {}", e);
            }
        }
    }
}
