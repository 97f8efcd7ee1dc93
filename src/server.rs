//! Static dev server for the course page.
//!
//! Serves the site directory as-is. Every response allows any origin and
//! forbids caching, so edits to lessons or translations show up on reload.

use crate::config::Config;
use anyhow::{bail, Context, Result};
use axum::http::{header, HeaderValue};
use axum::Router;
use std::future::Future;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";

/// Router serving `site_root`; directory requests get their `index.html`.
pub fn router(site_root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(site_root))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Bind to the configured port and serve until Ctrl+C.
pub async fn serve(config: &Config) -> Result<()> {
    if !config.site_root.is_dir() {
        bail!("Site root {} is not a directory", config.site_root.display());
    }

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    info!("Server running at {}", config.base_url());
    info!("Serving files from {}", config.site_root.display());
    info!("Press Ctrl+C to stop");

    serve_on(listener, &config.site_root, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` completes.
pub async fn serve_on<F>(listener: TcpListener, site_root: &Path, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(site_root))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Dev server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down server..."),
        Err(e) => {
            warn!("Cannot listen for Ctrl+C, serving until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
