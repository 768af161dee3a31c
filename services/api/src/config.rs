//! HTTP server configuration

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is unset
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,https://eli5-client.vercel.app";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_address: SocketAddr,
    /// Browser origins allowed to call the API
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS`: Listen address (default: "0.0.0.0:8000")
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins (default: local dev and the hosted client)
    pub fn from_env() -> Result<Self> {
        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address
            .parse()
            .with_context(|| format!("Invalid BIND_ADDRESS: {}", bind_address))?;

        let origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGINS.to_string());

        Ok(ServerConfig {
            bind_address,
            cors_allowed_origins: parse_origins(&origins),
        })
    }

    /// CORS policy for the configured origins
    ///
    /// Credentials are allowed, so methods and headers mirror the preflight
    /// request instead of using wildcards.
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origins = self
            .cors_allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
