//! Entitlement resolution (application-level orchestration).
//!
//! ```text
//! UserIdentifier
//!   ↓
//! 1. Account search via DirectoryQueryAdapter (one round-trip)
//!   ↓
//! 2. First matching record's group names, or none
//!   ↓
//! EntitlementsResult
//! ```
//!
//! The resolver is stateless; it holds no locks and performs no retries.
//! Timeouts come from the directory implementation.

use idgate_core::UserIdentifier;
use idgate_entitlements::{EntitlementsResult, first_record_groups};

use crate::config::QuerySettings;
use crate::directory::{DirectoryError, DirectoryQueryAdapter, DirectorySearcher};

#[derive(Debug, Clone)]
pub struct EntitlementsResolver<D> {
    adapter: DirectoryQueryAdapter<D>,
}

impl<D: DirectorySearcher> EntitlementsResolver<D> {
    pub fn new(adapter: DirectoryQueryAdapter<D>) -> Self {
        Self { adapter }
    }

    pub fn from_searcher(searcher: D, query: QuerySettings) -> Self {
        Self::new(DirectoryQueryAdapter::new(searcher, query))
    }

    /// Resolve entitlements, keeping directory failures distinguishable from
    /// "no entitlements".
    pub async fn try_resolve(&self, user: &UserIdentifier) -> Result<EntitlementsResult, DirectoryError> {
        let per_record = self.adapter.search_groups(user).await?;

        if per_record.len() > 1 {
            tracing::debug!(
                user = %user,
                matches = per_record.len(),
                "account search matched several entries; using the first"
            );
        }

        Ok(first_record_groups(per_record))
    }

    /// Resolve entitlements; any directory failure is logged and yields an
    /// empty result.
    pub async fn resolve(&self, user: &UserIdentifier) -> EntitlementsResult {
        match self.try_resolve(user).await {
            Ok(groups) => groups,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "entitlements lookup failed; returning none");
                EntitlementsResult::new()
            }
        }
    }
}
