use std::path::Path;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::query::{SearchRequest, SearchScope};
use super::r#trait::{DirectoryEntry, DirectoryError, DirectorySearcher};

/// In-memory directory.
///
/// Intended for tests/dev. Filters are evaluated structurally, so behaviour
/// matches a real server for equality searches without any escaping concerns.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    entries: RwLock<Vec<DirectoryEntry>>,
    unavailable: RwLock<Option<String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
            unavailable: RwLock::new(None),
        }
    }

    /// Load entries from a JSON array of [`DirectoryEntry`] objects.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::InvalidFixture(format!("{}: {e}", path.display())))?;
        Self::from_fixture_json(&raw)
    }

    pub fn from_fixture_json(raw: &str) -> Result<Self, DirectoryError> {
        let entries: Vec<DirectoryEntry> =
            serde_json::from_str(raw).map_err(|e| DirectoryError::InvalidFixture(e.to_string()))?;
        Ok(Self::with_entries(entries))
    }

    pub fn insert(&self, entry: DirectoryEntry) -> Result<(), DirectoryError> {
        self.entries
            .write()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?
            .push(entry);
        Ok(())
    }

    /// Make every subsequent search fail with `Unavailable(reason)`, or
    /// recover with `None`.
    pub fn set_unavailable(&self, reason: Option<String>) {
        *self.unavailable.write().unwrap_or_else(PoisonError::into_inner) = reason;
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn in_scope(dn: &str, base: &str, scope: SearchScope) -> bool {
    let dn = dn.to_ascii_lowercase();
    let base = base.to_ascii_lowercase();
    let parent = dn.split_once(',').map(|(_, rest)| rest).unwrap_or_default();

    match scope {
        SearchScope::Base => dn == base,
        SearchScope::OneLevel => parent == base,
        SearchScope::Subtree => base.is_empty() || dn == base || dn.ends_with(&format!(",{base}")),
    }
}

fn project(entry: &DirectoryEntry, attributes: &[String]) -> DirectoryEntry {
    if attributes.is_empty() {
        return entry.clone();
    }
    let mut projected = DirectoryEntry::new(entry.dn.clone());
    for (name, values) in &entry.attributes {
        if attributes.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            projected.attributes.insert(name.clone(), values.clone());
        }
    }
    projected
}

#[async_trait]
impl DirectorySearcher for InMemoryDirectory {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        if let Some(reason) = self
            .unavailable
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(DirectoryError::Unavailable(reason));
        }

        let entries = self
            .entries
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;

        Ok(entries
            .iter()
            .filter(|e| in_scope(&e.dn, &request.base, request.scope))
            .filter(|e| request.filter.matches(e))
            .map(|e| project(e, &request.attributes))
            .collect())
    }
}
