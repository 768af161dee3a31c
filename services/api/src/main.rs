use anyhow::Result;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod explain;
mod jwt;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

use crate::{
    config::ServerConfig,
    explain::{
        ExplanationGateway, TextGenerator, ThreadRngSource,
        gemini::{GeminiClient, GeminiConfig},
    },
    jwt::{JwtConfig, JwtService},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting ELI5 API service");

    let server_config = ServerConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let jwt_service = match JwtConfig::from_env().and_then(JwtService::new) {
        Ok(service) => Some(service),
        Err(e) => {
            error!("{}; authentication routes will be unavailable", e);
            None
        }
    };

    let generator: Option<Arc<dyn TextGenerator>> = match GeminiConfig::from_env() {
        Ok(gemini_config) => {
            let client = GeminiClient::new(gemini_config);
            info!("Gemini client configured with model {}", client.model());
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("{}; /api/explain will be unavailable", e);
            None
        }
    };

    let gateway = ExplanationGateway::new(generator, Arc::new(ThreadRngSource));
    let app_state = AppState::new(pool, jwt_service, gateway);

    // Start the web server
    let app = routes::create_router(app_state).layer(server_config.cors_layer()?);

    let listener = TcpListener::bind(server_config.bind_address).await?;
    info!("API service listening on {}", server_config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
