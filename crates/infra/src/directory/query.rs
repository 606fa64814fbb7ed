//! Search requests and filters.

use serde::{Deserialize, Serialize};

/// How far below the base a search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchScope {
    /// The base entry only.
    Base,
    /// Direct children of the base.
    OneLevel,
    /// The base and everything below it.
    Subtree,
}

/// Search filter.
///
/// Only the equality form is needed for account lookups. Rendering escapes
/// the value per RFC 4515, so an identifier such as `*` or `a)(x=y` matches
/// itself literally instead of widening the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchFilter {
    Equality { attribute: String, value: String },
}

impl SearchFilter {
    pub fn equality(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equality {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Whether an entry's values satisfy the filter.
    pub fn matches(&self, entry: &super::DirectoryEntry) -> bool {
        match self {
            Self::Equality { attribute, value } => entry.values(attribute).iter().any(|v| v == value),
        }
    }
}

impl core::fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Equality { attribute, value } => {
                write!(f, "({attribute}={})", ldap3::ldap_escape(value.as_str()))
            }
        }
    }
}

/// A single directory search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub base: String,
    pub scope: SearchScope,
    pub filter: SearchFilter,
    /// Attributes to return; empty means "all user attributes".
    pub attributes: Vec<String>,
}

impl SearchRequest {
    pub fn subtree(base: impl Into<String>, filter: SearchFilter) -> Self {
        Self {
            base: base.into(),
            scope: SearchScope::Subtree,
            filter,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes<I, A>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }
}
