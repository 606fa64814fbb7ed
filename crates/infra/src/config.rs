//! Directory settings.
//!
//! Plain data; reading them from the environment is the binary's job.

use std::path::PathBuf;
use std::time::Duration;

/// Which directory implementation backs entitlement lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryBackend {
    /// In-process fixture directory (dev/test).
    #[default]
    Memory,
    /// A real LDAP / Active Directory server.
    Ldap,
}

/// What to search for and which attribute carries group memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySettings {
    /// Search base; `""` searches the whole directory the server exposes.
    pub search_base: String,
    /// Attribute matched against the user identifier.
    pub account_attribute: String,
    /// Attribute listing the DNs of the user's groups.
    pub member_attribute: String,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            search_base: String::new(),
            account_attribute: "sAMAccountName".to_string(),
            member_attribute: "memberOf".to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BindCredentials {
    pub dn: String,
    pub password: String,
}

impl core::fmt::Debug for BindCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BindCredentials")
            .field("dn", &self.dn)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings for [`crate::LdapDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapSettings {
    pub url: String,
    /// Simple-bind credentials; anonymous when absent.
    pub bind: Option<BindCredentials>,
    pub starttls: bool,
    pub connect_timeout: Duration,
    pub operation_timeout: Duration,
}

impl Default for LdapSettings {
    fn default() -> Self {
        Self {
            url: "ldap://localhost:389".to_string(),
            bind: None,
            starttls: false,
            connect_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySettings {
    pub backend: DirectoryBackend,
    pub query: QuerySettings,
    pub ldap: LdapSettings,
    /// JSON fixture loaded into the memory backend at startup.
    pub fixtures: Option<PathBuf>,
}
