// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Reports service liveness together with the backend health probe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use pressroom_core::constants::service_names;

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> axum::Router {
        use axum::{extract::State, routing::get, Json, Router};

        async fn health_handler(
            State(resources): State<Arc<ServerResources>>,
        ) -> Json<serde_json::Value> {
            let backend = match resources.store.health().await {
                Ok(health) => serde_json::json!({
                    "status": "healthy",
                    "code": health.code,
                    "message": health.message,
                }),
                Err(e) => serde_json::json!({
                    "status": "unavailable",
                    "message": e.to_string(),
                }),
            };

            Json(serde_json::json!({
                "status": "healthy",
                "service": service_names::PRESSROOM_SERVER,
                "version": env!("CARGO_PKG_VERSION"),
                "backend": backend,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/api/health", get(health_handler))
            .with_state(resources)
    }
}
