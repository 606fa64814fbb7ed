//! Directory query adapter: user identifier in, per-record group names out.

use idgate_core::UserIdentifier;
use idgate_entitlements::{DirectoryRecord, GroupName};

use crate::config::QuerySettings;

use super::query::{SearchFilter, SearchRequest};
use super::r#trait::{DirectoryEntry, DirectoryError, DirectorySearcher, search_mapped};

/// Translates a user identifier into one account search and extracts group
/// names from every match.
#[derive(Debug, Clone)]
pub struct DirectoryQueryAdapter<D> {
    searcher: D,
    query: QuerySettings,
}

impl<D> DirectoryQueryAdapter<D> {
    pub fn new(searcher: D, query: QuerySettings) -> Self {
        Self { searcher, query }
    }

    /// Search for entries whose account attribute equals `user` exactly,
    /// anywhere below the configured base, fetching only group memberships.
    pub fn request_for(&self, user: &UserIdentifier) -> SearchRequest {
        SearchRequest::subtree(
            self.query.search_base.clone(),
            SearchFilter::equality(self.query.account_attribute.clone(), user.as_str()),
        )
        .with_attributes([self.query.member_attribute.clone()])
    }

    fn to_record(&self, entry: &DirectoryEntry) -> DirectoryRecord {
        DirectoryRecord::new(entry.values(&self.query.member_attribute).to_vec())
    }
}

impl<D: DirectorySearcher> DirectoryQueryAdapter<D> {
    /// One inner list per matching entry, in the order the directory returned them.
    pub async fn search_groups(&self, user: &UserIdentifier) -> Result<Vec<Vec<GroupName>>, DirectoryError> {
        let request = self.request_for(user);
        search_mapped(&self.searcher, &request, |entry| self.to_record(entry).group_names()).await
    }
}
