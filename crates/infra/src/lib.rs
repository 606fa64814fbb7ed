//! Infrastructure layer: directory access, entitlement resolution, settings.

pub mod config;
pub mod directory;
pub mod entitlements_resolver;

pub use config::{BindCredentials, DirectoryBackend, DirectorySettings, LdapSettings, QuerySettings};
pub use directory::{
    DirectoryEntry, DirectoryError, DirectoryQueryAdapter, DirectorySearcher, InMemoryDirectory,
    LdapDirectory, SearchFilter, SearchRequest, SearchScope, build_searcher,
};
pub use entitlements_resolver::EntitlementsResolver;
