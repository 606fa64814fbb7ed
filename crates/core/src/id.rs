//! Identifiers used across the gateway.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Opaque name of a directory principal (e.g. an account name).
///
/// The value is taken verbatim from the verified `sub` claim of a bearer token.
/// It is never persisted and carries no structure beyond "non-empty string".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentifier(String);

impl UserIdentifier {
    /// Wrap a raw identifier, rejecting the empty string.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::invalid_id("UserIdentifier: empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for UserIdentifier {}

impl core::fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserIdentifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserIdentifier {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_identifier() {
        assert_eq!(
            UserIdentifier::new(""),
            Err(DomainError::invalid_id("UserIdentifier: empty"))
        );
    }

    #[test]
    fn keeps_value_verbatim() {
        let id: UserIdentifier = "alice(admin)*".parse().unwrap();
        assert_eq!(id.as_str(), "alice(admin)*");
        assert_eq!(id.to_string(), "alice(admin)*");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserIdentifier::new("bob").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"bob\"");
    }
}
