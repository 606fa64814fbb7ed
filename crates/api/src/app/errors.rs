use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;

use idgate_infra::DirectoryError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 401 with an RFC 6750 challenge. `detail` is set when a token was
/// presented but rejected.
pub fn unauthorized(detail: Option<String>) -> axum::response::Response {
    let (challenge, message) = match detail {
        Some(detail) => (r#"Bearer error="invalid_token""#, detail),
        None => ("Bearer", "missing bearer token".to_string()),
    };

    let mut res = json_error(StatusCode::UNAUTHORIZED, "unauthorized", message);
    res.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
    res
}

pub fn directory_error_to_response(err: DirectoryError) -> axum::response::Response {
    json_error(StatusCode::BAD_GATEWAY, "directory_unavailable", err.to_string())
}
