use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::metrics;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

fn auth_config(cfg: &AppConfig) -> auth::ServerAuthConfig {
    let jwt_secret = if cfg.auth.jwt_secret.is_empty() {
        warn!("JWT_SECRET not set; using development secret");
        DEV_JWT_SECRET.to_string()
    } else {
        cfg.auth.jwt_secret.clone()
    };
    auth::ServerAuthConfig { jwt_secret, session_hours: cfg.auth.session_hours }
}

/// SQLite will create the file but not its directory.
fn ensure_sqlite_dir(url: &str) -> anyhow::Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else { return Ok(()) };
    let path = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Connect, migrate and assemble the router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    if !cfg.database.is_in_memory() {
        ensure_sqlite_dir(&cfg.database.url)?;
    }
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");
    metrics::init();

    let state = auth::ServerState::new(db, auth_config(cfg), cfg.limits.clone());
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "recipe-hub listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
