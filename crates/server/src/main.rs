// Teamcal API server
// Decision: Flexible auth with support for no-auth and JWT modes
// Decision: In-memory storage when DATABASE_URL is not set

use anyhow::{Context, Result};
use std::sync::Arc;
use teamcal_core::telemetry::{init_telemetry, TelemetryConfig};
use teamcal_server::auth::AuthConfig;
use teamcal_server::services::UserService;
use teamcal_server::storage::StorageBackend;
use teamcal_server::{build_router, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Configure via environment variables:
    // - SERVICE_NAME: Service name (default: "teamcal-server")
    // - RUST_LOG: Log filter (default: "teamcal_server=debug,tower_http=debug")
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "teamcal" {
        telemetry_config.service_name = "teamcal-server".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter = Some("teamcal_server=debug,tower_http=debug".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(telemetry_config);

    tracing::info!("teamcal-server starting...");

    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    let db = match config.database_url.as_deref() {
        Some(url) => {
            let backend = StorageBackend::postgres(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            backend
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            StorageBackend::in_memory()
        }
    };
    let db = Arc::new(db);

    let auth_config = AuthConfig::from_env();
    tracing::info!(mode = auth_config.mode.as_str(), "Authentication configured");

    if let Some(admin) = &config.admin {
        let user = UserService::new(db.clone())
            .ensure_admin(&admin.employee_number, &admin.name)
            .await
            .context("Failed to bootstrap admin account")?;
        tracing::info!(user_id = user.id, "Admin account ready");
    }

    tracing::info!(
        offset_minutes = config.zone.offset().local_minus_utc() / 60,
        production = config.is_production(),
        "Calendar zone configured"
    );
    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
    }

    let app = build_router(&config, auth_config, db);

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", config.http_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
