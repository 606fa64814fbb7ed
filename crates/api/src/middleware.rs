use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use idgate_auth::TokenVerifier;

use crate::app::errors::unauthorized;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Verify the bearer token and expose its claims to handlers.
///
/// Handlers behind this layer can rely on `Extension<Claims>` being present.
/// Claims beyond signature, issuer, audience and validity window (e.g. `sub`)
/// are left to the handlers that need them.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(|| unauthorized(None))?;

    let claims = state.verifier.verify(token, Utc::now()).map_err(|e| {
        tracing::info!(error = %e, "rejected bearer token");
        unauthorized(Some(e.to_string()))
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}

/// Request ids for `x-request-id`: time-ordered UUIDv7.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}
