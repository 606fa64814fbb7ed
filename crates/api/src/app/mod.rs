//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: directory + resolver wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router, extract::Request, routing::get};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use idgate_auth::JwtTokenVerifier;

use crate::config::GatewayConfig;
use crate::middleware::{self, AuthState, MakeRequestUuidV7};

pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub fn build_app(config: GatewayConfig) -> anyhow::Result<Router> {
    let verifier = JwtTokenVerifier::new(config.jwt).context("invalid JWT verification settings")?;
    let auth_state = AuthState {
        verifier: Arc::new(verifier),
    };

    let services = services::build_services(&config.directory, config.failure_policy)
        .context("failed to set up directory access")?;

    Ok(router(auth_state, Arc::new(services)))
}

/// Router over already-built collaborators (tests inject their own).
pub fn router(auth_state: AuthState, services: Arc<AppServices>) -> Router {
    // Protected routes: require a verified bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                    let request_id = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
