//! Server Implementation
//!
//! Router assembly and the HTTP listener.

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use http::{HeaderValue, Uri, header};
use serde_json::{Value, json};
use shared::error::InternalCause;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, Result, ServerError, ServerState};
use crate::utils::{AppError, ErrorCode};

/// Largest error body the debug layer will rewrite
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Build the application with all middleware and state
///
/// Used by the HTTP server and by integration tests (via `oneshot`).
pub fn build_router(state: ServerState) -> Router {
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            expose_internal_cause,
        ));

    api::router(&state)
        .fallback(endpoint_not_found)
        .layer(layers)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);

    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn endpoint_not_found(uri: Uri) -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Endpoint not found")
        .with_detail("path", uri.path().to_string())
}

/// In debug mode copy the internal cause of a failed request into `errors.debug`
async fn expose_internal_cause(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    if !state.config.debug {
        return response;
    }
    let Some(InternalCause(cause)) = response.extensions().get::<InternalCause>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read error body for debug output");
            return Response::from_parts(parts, Body::empty());
        }
    };
    let Ok(mut envelope) = serde_json::from_slice::<Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    if let Some(object) = envelope.as_object_mut() {
        let errors = object.entry("errors").or_insert_with(|| json!({}));
        if let Some(errors) = errors.as_object_mut() {
            errors.insert("debug".into(), Value::String(cause));
        }
    }

    match serde_json::to_vec(&envelope) {
        Ok(rewritten) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(rewritten))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_router(state);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!(
            environment = %self.config.environment,
            debug = self.config.debug,
            "Storefront server listening on {}",
            addr
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Io)?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
