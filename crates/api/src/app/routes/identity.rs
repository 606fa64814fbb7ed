use axum::{Json, extract::Extension};

use idgate_auth::Claims;

/// The verified token claims, verbatim.
pub async fn identity(Extension(claims): Extension<Claims>) -> Json<Claims> {
    Json(claims)
}
