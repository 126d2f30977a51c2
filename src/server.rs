// ABOUTME: Router assembly and HTTP serving with graceful shutdown
// ABOUTME: Layers request ids, request tracing, and CORS over the domain routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::Request, http::HeaderName, Router};
use pressroom_core::constants::messages;
use pressroom_core::errors::AppError;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span, warn};

use crate::config::{CorsConfig, ServerConfig};
use crate::middleware::{setup_cors, REQUEST_ID_HEADER};
use crate::resources::ServerResources;
use crate::routes::{ArticleRoutes, AuthRoutes, HealthRoutes};

/// Build the complete application router
pub fn router(resources: &Arc<ServerResources>, cors: &CorsConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(ArticleRoutes::routes(Arc::clone(resources)))
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .fallback(|| async { AppError::not_found(messages::NOT_FOUND) })
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(trace)
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(setup_cors(cors))
}

/// Bind the configured address and serve until interrupted
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &ServerConfig, resources: Arc<ServerResources>) -> Result<()> {
    let address = format!("{}:{}", config.host, config.http_port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("HTTP server listening on http://{address}");
    axum::serve(listener, router(&resources, &config.cors))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                wait_for_ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            () = wait_for_ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    wait_for_ctrl_c().await;

    info!("Shutdown signal received");
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
