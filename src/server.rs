// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Static file server for the built browser demo (Axum)

use std::path::Path;

use anyhow::Context;
use axum::http::StatusCode;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use webnn_config::ServerConfig;

/// Router serving every file under `dist_dir`, `index.html` for directories
pub fn create_static_router(dist_dir: impl AsRef<Path>) -> Router {
    let dist_dir = dist_dir.as_ref();
    if !dist_dir.is_dir() {
        warn!(
            target: "webnn-demo",
            "Dist directory {} does not exist; every request will return 404",
            dist_dir.display()
        );
    }

    let files = ServeDir::new(dist_dir).append_index_html_on_directories(true);

    Router::new()
        .fallback_service(files)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::span!(
                        target: "webnn-demo",
                        tracing::Level::DEBUG,
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        if response.status() == StatusCode::NOT_FOUND {
                            warn!(target: "webnn-demo", "Not found, latency={:?}", latency);
                        } else {
                            debug!(
                                target: "webnn-demo",
                                "Response: status={}, latency={:?}",
                                response.status(),
                                latency
                            );
                        }
                    },
                ),
        )
}

/// Bind `host:port` and serve `dist_dir` until the process is stopped
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let bind_address = format!("{}:{}", config.host, config.port);
    let app = create_static_router(&config.dist_dir);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!(
        target: "webnn-demo",
        "Starting server on http://{} (serving {})",
        bind_address,
        config.dist_dir.display()
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
