//! Gateway configuration, read from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LISTEN_ADDR` | `0.0.0.0:8080` |
//! | `JWT_ALGORITHM` | `HS256` |
//! | `JWT_SECRET` | insecure dev secret (HMAC algorithms) |
//! | `JWT_PUBLIC_KEY_PATH` | required for RSA/ECDSA/EdDSA algorithms |
//! | `JWT_ISSUER`, `JWT_AUDIENCE` | not enforced |
//! | `JWT_LEEWAY_SECS` | `60` |
//! | `DIRECTORY_BACKEND` | `memory` (`ldap` for a real server) |
//! | `DIRECTORY_FIXTURES` | none (memory backend starts empty) |
//! | `LDAP_URL` | required for the ldap backend |
//! | `LDAP_BIND_DN`, `LDAP_BIND_PASSWORD` | anonymous bind |
//! | `LDAP_STARTTLS` | `false` |
//! | `LDAP_SEARCH_BASE` | `""` |
//! | `LDAP_ACCOUNT_ATTRIBUTE` | `sAMAccountName` |
//! | `LDAP_MEMBER_ATTRIBUTE` | `memberOf` |
//! | `LDAP_CONNECT_TIMEOUT_SECS` | `5` |
//! | `LDAP_OPERATION_TIMEOUT_SECS` | `10` |
//! | `ENTITLEMENTS_FAILURE_POLICY` | `degrade` (`surface` answers 502) |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use idgate_auth::{JwtSettings, VerificationKey};
use idgate_infra::{BindCredentials, DirectoryBackend, DirectorySettings, LdapSettings, QuerySettings};

const DEV_JWT_SECRET: &str = "dev-secret";

/// What `/entitlements` answers when the directory lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryFailurePolicy {
    /// `200 []`, indistinguishable from a user without groups.
    #[default]
    Degrade,
    /// `502` with an error body.
    Surface,
}

impl FromStr for DirectoryFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "surface" => Ok(Self::Surface),
            other => Err(format!("expected 'degrade' or 'surface', got '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is required{hint}")]
    Missing { var: &'static str, hint: &'static str },

    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },

    #[error("failed to read {var} file '{path}': {source}")]
    Io {
        var: &'static str,
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    pub jwt: JwtSettings,
    pub directory: DirectorySettings,
    pub failure_policy: DirectoryFailurePolicy,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let listen_addr = parse_or(&get, "LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?;

        Ok(Self {
            listen_addr,
            jwt: jwt_settings(&get)?,
            directory: directory_settings(&get)?,
            failure_policy: parse_or(&get, "ENTITLEMENTS_FAILURE_POLICY", DirectoryFailurePolicy::default())?,
        })
    }
}

fn parse_or<G, T>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match get(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn seconds_or<G>(get: &G, var: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    parse_or(get, var, default).map(Duration::from_secs)
}

fn jwt_settings<G>(get: &G) -> Result<JwtSettings, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let algorithm: Algorithm = parse_or(get, "JWT_ALGORITHM", Algorithm::HS256)?;

    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            let secret = get("JWT_SECRET").unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            });
            VerificationKey::Secret(secret.into_bytes())
        }
        _ => {
            let path = get("JWT_PUBLIC_KEY_PATH").ok_or(ConfigError::Missing {
                var: "JWT_PUBLIC_KEY_PATH",
                hint: " for asymmetric JWT algorithms",
            })?;
            let pem = std::fs::read(&path).map_err(|source| ConfigError::Io {
                var: "JWT_PUBLIC_KEY_PATH",
                path: path.clone(),
                source,
            })?;
            VerificationKey::PublicKeyPem(pem)
        }
    };

    let leeway_secs: i64 = parse_or(get, "JWT_LEEWAY_SECS", 60)?;
    if leeway_secs < 0 {
        return Err(ConfigError::Invalid {
            var: "JWT_LEEWAY_SECS",
            message: "must not be negative".to_string(),
        });
    }

    Ok(JwtSettings {
        algorithm,
        key,
        issuer: get("JWT_ISSUER"),
        audience: get("JWT_AUDIENCE"),
        leeway: chrono::Duration::seconds(leeway_secs),
    })
}

fn directory_settings<G>(get: &G) -> Result<DirectorySettings, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let backend = match get("DIRECTORY_BACKEND").map(|v| v.trim().to_ascii_lowercase()) {
        None => DirectoryBackend::Memory,
        Some(v) if v == "memory" => DirectoryBackend::Memory,
        Some(v) if v == "ldap" => DirectoryBackend::Ldap,
        Some(other) => {
            return Err(ConfigError::Invalid {
                var: "DIRECTORY_BACKEND",
                message: format!("expected 'memory' or 'ldap', got '{other}'"),
            });
        }
    };

    let defaults = QuerySettings::default();
    let query = QuerySettings {
        search_base: get("LDAP_SEARCH_BASE").unwrap_or(defaults.search_base),
        account_attribute: get("LDAP_ACCOUNT_ATTRIBUTE").unwrap_or(defaults.account_attribute),
        member_attribute: get("LDAP_MEMBER_ATTRIBUTE").unwrap_or(defaults.member_attribute),
    };

    let bind = match (get("LDAP_BIND_DN"), get("LDAP_BIND_PASSWORD")) {
        (Some(dn), Some(password)) => Some(BindCredentials { dn, password }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::Missing {
                var: "LDAP_BIND_PASSWORD",
                hint: " when LDAP_BIND_DN is set",
            });
        }
        (None, Some(_)) => {
            return Err(ConfigError::Missing {
                var: "LDAP_BIND_DN",
                hint: " when LDAP_BIND_PASSWORD is set",
            });
        }
    };

    let ldap_defaults = LdapSettings::default();
    let url = match (backend, get("LDAP_URL")) {
        (_, Some(url)) => url,
        (DirectoryBackend::Ldap, None) => {
            return Err(ConfigError::Missing {
                var: "LDAP_URL",
                hint: " when DIRECTORY_BACKEND=ldap",
            });
        }
        (DirectoryBackend::Memory, None) => ldap_defaults.url,
    };

    let ldap = LdapSettings {
        url,
        bind,
        starttls: parse_or(get, "LDAP_STARTTLS", ldap_defaults.starttls)?,
        connect_timeout: seconds_or(get, "LDAP_CONNECT_TIMEOUT_SECS", ldap_defaults.connect_timeout.as_secs())?,
        operation_timeout: seconds_or(
            get,
            "LDAP_OPERATION_TIMEOUT_SECS",
            ldap_defaults.operation_timeout.as_secs(),
        )?,
    };

    Ok(DirectorySettings {
        backend,
        query,
        ldap,
        fixtures: get("DIRECTORY_FIXTURES").map(Into::into),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_are_dev_friendly() {
        let cfg = config(&[]).unwrap();

        assert_eq!(cfg.listen_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(cfg.jwt.algorithm, Algorithm::HS256);
        assert!(matches!(&cfg.jwt.key, VerificationKey::Secret(s) if s == b"dev-secret"));
        assert_eq!(cfg.jwt.leeway, chrono::Duration::seconds(60));
        assert_eq!(cfg.directory.backend, DirectoryBackend::Memory);
        assert_eq!(cfg.directory.query, QuerySettings::default());
        assert_eq!(cfg.failure_policy, DirectoryFailurePolicy::Degrade);
    }

    #[test]
    fn ldap_backend_reads_all_settings() {
        let cfg = config(&[
            ("DIRECTORY_BACKEND", "LDAP"),
            ("LDAP_URL", "ldaps://dc1.corp.example:636"),
            ("LDAP_BIND_DN", "CN=svc,OU=Service,DC=corp"),
            ("LDAP_BIND_PASSWORD", "hunter2"),
            ("LDAP_SEARCH_BASE", "DC=corp,DC=example"),
            ("LDAP_ACCOUNT_ATTRIBUTE", "uid"),
            ("LDAP_MEMBER_ATTRIBUTE", "isMemberOf"),
            ("LDAP_STARTTLS", "true"),
            ("LDAP_CONNECT_TIMEOUT_SECS", "2"),
            ("LDAP_OPERATION_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        let dir = &cfg.directory;
        assert_eq!(dir.backend, DirectoryBackend::Ldap);
        assert_eq!(dir.ldap.url, "ldaps://dc1.corp.example:636");
        assert_eq!(dir.ldap.bind.as_ref().unwrap().password, "hunter2");
        assert!(dir.ldap.starttls);
        assert_eq!(dir.ldap.connect_timeout, Duration::from_secs(2));
        assert_eq!(dir.ldap.operation_timeout, Duration::from_secs(3));
        assert_eq!(dir.query.search_base, "DC=corp,DC=example");
        assert_eq!(dir.query.account_attribute, "uid");
        assert_eq!(dir.query.member_attribute, "isMemberOf");
    }

    #[test]
    fn ldap_backend_requires_url() {
        let err = config(&[("DIRECTORY_BACKEND", "ldap")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { var: "LDAP_URL", .. }));
    }

    #[test]
    fn bind_dn_requires_password() {
        let err = config(&[("LDAP_BIND_DN", "CN=svc")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { var: "LDAP_BIND_PASSWORD", .. }));
    }

    #[test]
    fn asymmetric_algorithm_requires_public_key() {
        let err = config(&[("JWT_ALGORITHM", "RS256")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { var: "JWT_PUBLIC_KEY_PATH", .. }));
    }

    #[test]
    fn jwt_pinning_and_leeway() {
        let cfg = config(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_ISSUER", "https://issuer.example"),
            ("JWT_AUDIENCE", "idgate"),
            ("JWT_LEEWAY_SECS", "5"),
        ])
        .unwrap();

        assert!(matches!(&cfg.jwt.key, VerificationKey::Secret(s) if s == b"s3cret"));
        assert_eq!(cfg.jwt.issuer.as_deref(), Some("https://issuer.example"));
        assert_eq!(cfg.jwt.audience.as_deref(), Some("idgate"));
        assert_eq!(cfg.jwt.leeway, chrono::Duration::seconds(5));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config(&[("LISTEN_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LISTEN_ADDR", .. }));

        let err = config(&[("ENTITLEMENTS_FAILURE_POLICY", "explode")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ENTITLEMENTS_FAILURE_POLICY", .. }));

        let err = config(&[("JWT_LEEWAY_SECS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "JWT_LEEWAY_SECS", .. }));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("LISTEN_ADDR", "  "), ("ENTITLEMENTS_FAILURE_POLICY", "")]).unwrap();
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(cfg.failure_policy, DirectoryFailurePolicy::Degrade);
    }

    #[test]
    fn surface_policy_is_recognised() {
        let cfg = config(&[("ENTITLEMENTS_FAILURE_POLICY", "Surface")]).unwrap();
        assert_eq!(cfg.failure_policy, DirectoryFailurePolicy::Surface);
    }
}
