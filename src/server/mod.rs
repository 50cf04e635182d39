//! HTTP front end
//!
//! - `config`: command line flags
//! - `error`: startup and rendering errors
//! - `host`: revision identifier from the request host
//! - `listing`: directory listing template
//! - `mime`: content type table
//! - `router`: request dispatch
//! - `state`: shared per-process context

use crate::server::config::Config;
use crate::server::state::ServerContext;
use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod host;
pub mod listing;
pub mod mime;
pub mod router;
pub mod state;

/// Build the application; a single fallback handler serves every route
pub fn app(context: ServerContext) -> Router {
    Router::new()
        .fallback(router::serve)
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

/// Load the context, bind and serve until Ctrl-C
pub async fn run(config: Config) -> anyhow::Result<()> {
    let context = ServerContext::load(&config)?;

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to listen on {address}"))?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app(context))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "unable to listen for Ctrl-C");
            std::future::pending::<()>().await
        }
    }
}
