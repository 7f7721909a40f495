//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors. Request errors are rendered by the
//! auth crate through `kernel::error::AppError`.

use auth::application::config::SIGNING_KEY_VAR;
use auth::{AuthConfig, ConfigError, PgUserDirectory, auth_router};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let auth_config = load_auth_config()?;

    // Database connection
    let database_url =
        env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // CORS configuration
    let cors = cors_layer(&env::var("BACKEND_CORS_ORIGINS").unwrap_or_default());

    // Build router
    let app = Router::new()
        .nest("/auth", auth_router(PgUserDirectory::new(pool), auth_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Read auth settings from the environment. Debug builds fall back to a
/// random signing key, so tokens do not survive a restart.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    match AuthConfig::from_env() {
        Ok(config) => Ok(config),
        Err(ConfigError::Missing(SIGNING_KEY_VAR)) if cfg!(debug_assertions) => {
            tracing::warn!("{SIGNING_KEY_VAR} not set, using a random development key");
            let dev_key = auth::application::config::generate_signing_key();
            Ok(AuthConfig::from_lookup(|key| {
                if key == SIGNING_KEY_VAR {
                    Some(dev_key.clone())
                } else {
                    env::var(key).ok()
                }
            })?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Comma-separated origin list. Unparseable entries are skipped.
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.trim_end_matches('/').parse().ok())
        .collect()
}

fn cors_layer(raw_origins: &str) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(parse_origins(raw_origins))
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins(" http://localhost:3000/ ,https://tasks.example.com,,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
        assert_eq!(origins[1], "https://tasks.example.com");
    }

    #[test]
    fn test_parse_origins_empty() {
        assert!(parse_origins("").is_empty());
    }
}
