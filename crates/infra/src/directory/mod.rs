//! Directory service boundary.
//!
//! The gateway never talks to a directory directly: everything goes through
//! [`DirectorySearcher`], with an LDAP implementation for production and an
//! in-memory one for tests/dev.

pub mod adapter;
pub mod in_memory;
pub mod ldap;
pub mod query;
pub mod r#trait;

use std::sync::Arc;

pub use adapter::DirectoryQueryAdapter;
pub use in_memory::InMemoryDirectory;
pub use ldap::LdapDirectory;
pub use query::{SearchFilter, SearchRequest, SearchScope};
pub use r#trait::{DirectoryEntry, DirectoryError, DirectorySearcher, search_mapped};

use crate::config::{DirectoryBackend, DirectorySettings};

/// Build the searcher selected by `settings.backend`.
pub fn build_searcher(settings: &DirectorySettings) -> Result<Arc<dyn DirectorySearcher>, DirectoryError> {
    match settings.backend {
        DirectoryBackend::Ldap => {
            tracing::info!(url = %settings.ldap.url, base = %settings.query.search_base, "using ldap directory");
            Ok(Arc::new(LdapDirectory::new(settings.ldap.clone())))
        }
        DirectoryBackend::Memory => {
            let dir = match &settings.fixtures {
                Some(path) => InMemoryDirectory::from_fixture_file(path)?,
                None => InMemoryDirectory::new(),
            };
            tracing::warn!(entries = dir.len(), "using in-memory directory (dev only)");
            Ok(Arc::new(dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn memory_backend_loads_fixtures() {
        let path = std::env::temp_dir().join(format!("idgate-fixture-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"[{"dn":"CN=a","attributes":{"sAMAccountName":["a"]}}]"#)
            .unwrap();

        let settings = DirectorySettings {
            fixtures: Some(path.clone()),
            ..DirectorySettings::default()
        };
        assert!(build_searcher(&settings).is_ok());

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn memory_backend_rejects_missing_fixture() {
        let settings = DirectorySettings {
            fixtures: Some("/nope/fixture.json".into()),
            ..DirectorySettings::default()
        };
        assert!(matches!(build_searcher(&settings), Err(DirectoryError::InvalidFixture(_))));
    }
}
