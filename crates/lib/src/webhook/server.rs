//! Routing table and HTTP server lifecycle.

use crate::config::{self, Config};
use crate::webhook::action::handle_action;
use crate::webhook::auth::{require_basic_auth, Credentials};
use crate::webhook::landing;
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the routing table: landing page, static assets, and `/action` behind Basic auth.
pub fn router(credentials: Credentials) -> Router {
    let credentials = Arc::new(credentials);
    let action = Router::new()
        .route("/action", post(handle_action))
        .route_layer(middleware::from_fn_with_state(credentials, require_basic_auth));

    Router::new()
        .route("/", get(landing::index))
        .route("/static/*path", get(landing::static_asset))
        .merge(action)
}

/// Credentials resolved from config and environment.
pub fn credentials_from_config(config: &Config) -> Credentials {
    let (username, password) = config::resolve_credentials(config);
    Credentials::new(username, password)
}

/// Run the webhook server; binds to config.server.bind:config.server.port.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(config: Config) -> Result<()> {
    let credentials = credentials_from_config(&config);
    let bind = config.server.bind.trim();
    if !config::is_loopback_bind(bind) && credentials.is_builtin_default() {
        log::warn!(
            "binding to {} with the built-in credentials; set auth.username/auth.password or MIRROR_USERNAME/MIRROR_PASSWORD",
            bind
        );
    }

    let app = router(credentials);

    let bind_addr = format!("{}:{}", bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("magic mirror listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("magic mirror stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {}", e);
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
    log::info!("shutdown signal received, draining connections");
}
