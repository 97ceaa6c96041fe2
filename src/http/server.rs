//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers mounted under the API prefix
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Bind server to listener and stop on the shutdown signal

use axum::{
    extract::Request,
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ServerConfig, ServiceConfig};
use crate::content::{ContentCatalog, ContentEncoder, GroupSet};
use crate::http::handlers::{
    get_rule_names, get_static_content, list_groups, main_endpoint, serve_api_spec_file,
};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::observability::metrics::track_metrics;

/// Application state injected into handlers.
///
/// Catalog and groups are never written after construction, so handlers share
/// them without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ContentCatalog>,
    pub groups: Arc<GroupSet>,
    pub config: Arc<ServiceConfig>,
    pub encoder: ContentEncoder,
}

/// HTTP server for the content service.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a new HTTP server serving the given content.
    pub fn new(config: ServiceConfig, catalog: Arc<ContentCatalog>, groups: Arc<GroupSet>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            catalog,
            groups,
            encoder: ContentEncoder::new(config.content.max_encoded_bytes),
            config: config.clone(),
        };

        let router = Self::build_router(&config.server, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let prefix = config.api_prefix.as_str();

        let mut router = Router::new()
            .route(prefix, get(main_endpoint))
            .route(&format!("{}groups", prefix), get(list_groups))
            .route(&format!("{}content", prefix), get(get_static_content))
            .route(&format!("{}rules", prefix), get(get_rule_names));
        if let Some(spec_route) = config.api_spec_route() {
            router = router.route(&spec_route, get(serve_api_spec_file));
        }

        router
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request)
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server until the shutdown receiver fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_prefix = %self.config.server.api_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Consume the server, returning its router.
    pub fn into_router(self) -> Router {
        self.router
    }
}
