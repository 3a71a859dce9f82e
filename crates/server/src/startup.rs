use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth::{ServerAuthConfig, ServerState};
use crate::rate_limit::RateLimiter;
use crate::routes;

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Host/port from configs, or env vars when no config file is present.
fn load_bind_addr(cfg: Option<&configs::AppConfig>) -> anyhow::Result<SocketAddr> {
    let (host, port) = match cfg {
        Some(cfg) => (cfg.server.host.clone(), cfg.server.port),
        None => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate().ok();

    let db = models::db::connect().await?;

    let (jwt_secret, token_ttl_hours) = match &cfg {
        Some(c) if !c.auth.jwt_secret.trim().is_empty() => {
            (c.auth.jwt_secret.clone(), c.auth.token_ttl_hours)
        }
        _ => (env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string()), 12),
    };
    let limiter = match &cfg {
        Some(c) => RateLimiter::new(c.rate_limit.requests_per_second, c.rate_limit.burst, c.rate_limit.enabled),
        None => RateLimiter::new(50, 100, true),
    };
    let state = ServerState {
        db,
        auth: ServerAuthConfig { jwt_secret, token_ttl_hours },
        limiter,
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr = load_bind_addr(cfg.as_ref())?;
    info!(%addr, "starting marketplace api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
