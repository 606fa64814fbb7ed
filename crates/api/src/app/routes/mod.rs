use axum::{Router, routing::get};

pub mod entitlements;
pub mod identity;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/identity", get(identity::identity))
        .route("/entitlements", get(entitlements::entitlements))
}
