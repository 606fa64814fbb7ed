//! LDAP-backed directory searcher.
//!
//! ## Error Mapping
//!
//! | ldap3 failure | DirectoryError |
//! |---------------|----------------|
//! | connect / StartTLS | `Connect` |
//! | simple bind (transport or non-zero result code) | `Bind` |
//! | search (transport or non-zero result code) | `Search` |
//! | any operation exceeding its timeout | `Timeout` |
//!
//! ## Thread Safety
//!
//! `LdapDirectory` holds settings only; every search opens its own
//! connection, so concurrent requests never share protocol state.

use async_trait::async_trait;
use ldap3::{LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use tracing::instrument;

use crate::config::LdapSettings;

use super::query::{SearchRequest, SearchScope};
use super::r#trait::{DirectoryEntry, DirectoryError, DirectorySearcher};

/// Directory searcher talking to an LDAP / Active Directory server.
#[derive(Debug, Clone)]
pub struct LdapDirectory {
    settings: LdapSettings,
}

impl LdapDirectory {
    pub fn new(settings: LdapSettings) -> Self {
        Self { settings }
    }
}

fn scope(scope: SearchScope) -> Scope {
    match scope {
        SearchScope::Base => Scope::Base,
        SearchScope::OneLevel => Scope::OneLevel,
        SearchScope::Subtree => Scope::Subtree,
    }
}

fn map_err(err: LdapError, wrap: fn(String) -> DirectoryError) -> DirectoryError {
    match err {
        LdapError::Timeout { .. } => DirectoryError::Timeout,
        other => wrap(other.to_string()),
    }
}

/// Keep the string-valued attributes; binary values cannot hold DNs we parse.
fn into_entry(entry: SearchEntry) -> DirectoryEntry {
    DirectoryEntry {
        dn: entry.dn,
        attributes: entry.attrs.into_iter().collect(),
    }
}

#[async_trait]
impl DirectorySearcher for LdapDirectory {
    #[instrument(
        skip(self, request),
        fields(url = %self.settings.url, base = %request.base, filter = %request.filter)
    )]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        let conn_settings = LdapConnSettings::new()
            .set_conn_timeout(self.settings.connect_timeout)
            .set_starttls(self.settings.starttls);

        let (conn, mut ldap) = LdapConnAsync::with_settings(conn_settings, &self.settings.url)
            .await
            .map_err(|e| map_err(e, DirectoryError::Connect))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "ldap connection driver stopped");
            }
        });

        if let Some(bind) = &self.settings.bind {
            ldap.with_timeout(self.settings.operation_timeout)
                .simple_bind(&bind.dn, &bind.password)
                .await
                .and_then(|res| res.success())
                .map_err(|e| map_err(e, DirectoryError::Bind))?;
        }

        let filter = request.filter.to_string();
        let (entries, _res) = ldap
            .with_timeout(self.settings.operation_timeout)
            .search(&request.base, scope(request.scope), &filter, request.attributes.clone())
            .await
            .and_then(|res| res.success())
            .map_err(|e| map_err(e, DirectoryError::Search))?;

        if let Err(e) = ldap.unbind().await {
            tracing::debug!(error = %e, "ldap unbind failed");
        }

        tracing::debug!(matches = entries.len(), "ldap search completed");
        Ok(entries.into_iter().map(SearchEntry::construct).map(into_entry).collect())
    }
}
