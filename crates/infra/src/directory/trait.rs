use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::query::SearchRequest;

/// One entry returned by a directory search.
///
/// Attribute names are compared case-insensitively, as LDAP does. Only
/// string values are kept; binary values never reach this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub dn: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style helper, mostly for fixtures and tests.
    pub fn with_values<I, V>(mut self, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .entry(attribute.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Values of `attribute`, or an empty slice when the entry lacks it.
    pub fn values(&self, attribute: &str) -> &[String] {
        self.attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(attribute))
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }
}

/// Directory operation error.
///
/// These never leave the entitlements resolver as errors in the default
/// configuration; see [`crate::EntitlementsResolver::resolve`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory connection failed: {0}")]
    Connect(String),

    #[error("directory bind failed: {0}")]
    Bind(String),

    #[error("directory search failed: {0}")]
    Search(String),

    #[error("directory operation timed out")]
    Timeout,

    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("invalid directory fixture: {0}")]
    InvalidFixture(String),
}

/// Capability to run one search against a directory service.
///
/// Implementations own connection handling entirely and must be safe to call
/// from many in-flight requests at once.
#[async_trait]
pub trait DirectorySearcher: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<DirectoryEntry>, DirectoryError>;
}

#[async_trait]
impl<S> DirectorySearcher for Arc<S>
where
    S: DirectorySearcher + ?Sized,
{
    async fn search(&self, request: &SearchRequest) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        (**self).search(request).await
    }
}

/// Run a search and map every returned entry.
pub async fn search_mapped<S, T, F>(
    searcher: &S,
    request: &SearchRequest,
    mapper: F,
) -> Result<Vec<T>, DirectoryError>
where
    S: DirectorySearcher + ?Sized,
    F: Fn(&DirectoryEntry) -> T,
{
    let entries = searcher.search(request).await?;
    Ok(entries.iter().map(mapper).collect())
}
