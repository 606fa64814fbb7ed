//! Service wiring: directory searcher + entitlements resolver.

use std::sync::Arc;

use idgate_infra::{DirectoryError, DirectorySearcher, DirectorySettings, EntitlementsResolver, build_searcher};

use crate::config::DirectoryFailurePolicy;

pub type SharedSearcher = Arc<dyn DirectorySearcher>;

pub struct AppServices {
    pub resolver: EntitlementsResolver<SharedSearcher>,
    pub failure_policy: DirectoryFailurePolicy,
}

impl AppServices {
    pub fn new(
        searcher: SharedSearcher,
        settings: &DirectorySettings,
        failure_policy: DirectoryFailurePolicy,
    ) -> Self {
        Self {
            resolver: EntitlementsResolver::from_searcher(searcher, settings.query.clone()),
            failure_policy,
        }
    }
}

pub fn build_services(
    settings: &DirectorySettings,
    failure_policy: DirectoryFailurePolicy,
) -> Result<AppServices, DirectoryError> {
    let searcher = build_searcher(settings)?;
    Ok(AppServices::new(searcher, settings, failure_policy))
}
