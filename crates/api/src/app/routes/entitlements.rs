use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    response::{IntoResponse, Response},
};

use idgate_auth::Claims;
use idgate_entitlements::EntitlementsResult;

use crate::app::errors::{directory_error_to_response, unauthorized};
use crate::app::services::AppServices;
use crate::config::DirectoryFailurePolicy;

/// Group names of the token subject, as a JSON array.
///
/// The token must carry a non-empty string `sub`; it is the directory account name.
pub async fn entitlements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
) -> Response {
    let user = match claims.user_identifier() {
        Ok(user) => user,
        Err(e) => {
            tracing::info!(error = %e, "token has no usable subject");
            return unauthorized(Some(e.to_string()));
        }
    };

    let groups: EntitlementsResult = match services.failure_policy {
        DirectoryFailurePolicy::Degrade => services.resolver.resolve(&user).await,
        DirectoryFailurePolicy::Surface => match services.resolver.try_resolve(&user).await {
            Ok(groups) => groups,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "entitlements lookup failed");
                return directory_error_to_response(e);
            }
        },
    };

    Json(groups).into_response()
}
