use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use idgate_core::UserIdentifier;

/// The verified claim set of a bearer token.
///
/// Claims are kept verbatim (names, values and order) so they can be echoed
/// back to the caller unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The `sub` claim, when present as a string.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// The subject as a directory principal name.
    pub fn user_identifier(&self) -> Result<UserIdentifier, TokenValidationError> {
        let sub = self
            .subject()
            .ok_or_else(|| TokenValidationError::MissingClaim("sub".to_string()))?;
        UserIdentifier::new(sub).map_err(|_| TokenValidationError::MissingClaim("sub".to_string()))
    }

    /// Read a NumericDate claim (`exp`, `nbf`, `iat`).
    ///
    /// Fractional seconds are truncated. A present but non-numeric value is
    /// rejected as malformed.
    pub fn numeric_date(&self, name: &str) -> Result<Option<DateTime<Utc>>, TokenValidationError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };

        let seconds = value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .ok_or_else(|| TokenValidationError::Malformed(format!("claim '{name}' is not a number")))?;

        Utc.timestamp_opt(seconds, 0)
            .single()
            .map(Some)
            .ok_or_else(|| TokenValidationError::Malformed(format!("claim '{name}' is out of range")))
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("invalid token issuer")]
    InvalidIssuer,

    #[error("invalid token audience")]
    InvalidAudience,

    #[error("missing required claim '{0}'")]
    MissingClaim(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token algorithm not accepted")]
    UnsupportedAlgorithm,

    #[error("verification key error: {0}")]
    Key(String),
}

/// Deterministically validate the time-related claims of a token.
///
/// `exp` is required. `nbf` and `iat` are checked only when present. `leeway`
/// absorbs clock skew in both directions.
///
/// Note: this validates the *claims* only. Signature, issuer and audience
/// checks happen in [`crate::JwtTokenVerifier`].
pub fn validate_claims(
    claims: &Claims,
    now: DateTime<Utc>,
    leeway: Duration,
) -> Result<(), TokenValidationError> {
    let expires_at = claims
        .numeric_date("exp")?
        .ok_or_else(|| TokenValidationError::MissingClaim("exp".to_string()))?;

    if let Some(issued_at) = claims.numeric_date("iat")? {
        if expires_at <= issued_at {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
    }
    if let Some(not_before) = claims.numeric_date("nbf")? {
        if now + leeway < not_before {
            return Err(TokenValidationError::NotYetValid);
        }
    }
    if now - leeway >= expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        match value {
            Value::Object(map) => Claims::new(map),
            other => panic!("expected object, got {other}"),
        }
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn subject_is_read_as_string() {
        let c = claims(json!({"sub": "alice", "name": "Alice"}));
        assert_eq!(c.subject(), Some("alice"));
        assert_eq!(c.user_identifier().unwrap().as_str(), "alice");
    }

    #[test]
    fn non_string_subject_is_missing() {
        let c = claims(json!({"sub": 42}));
        assert_eq!(c.subject(), None);
        assert_eq!(
            c.user_identifier(),
            Err(TokenValidationError::MissingClaim("sub".to_string()))
        );
    }

    #[test]
    fn empty_subject_is_missing() {
        let c = claims(json!({"sub": ""}));
        assert!(c.user_identifier().is_err());
    }

    #[test]
    fn claims_serialize_verbatim_in_order() {
        let c = claims(json!({"sub": "bob", "name": "Bob Smith", "groups": ["x"]}));
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"sub":"bob","name":"Bob Smith","groups":["x"]}"#
        );
    }

    #[test]
    fn valid_window_passes() {
        let c = claims(json!({"iat": 1_000, "nbf": 1_000, "exp": 2_000}));
        assert_eq!(validate_claims(&c, at(1_500), Duration::zero()), Ok(()));
    }

    #[test]
    fn missing_exp_is_rejected() {
        let c = claims(json!({"iat": 1_000}));
        assert_eq!(
            validate_claims(&c, at(1_500), Duration::zero()),
            Err(TokenValidationError::MissingClaim("exp".to_string()))
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let c = claims(json!({"exp": 2_000}));
        assert_eq!(
            validate_claims(&c, at(2_000), Duration::zero()),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn leeway_tolerates_small_skew() {
        let c = claims(json!({"exp": 2_000, "nbf": 1_000}));
        assert_eq!(validate_claims(&c, at(2_030), Duration::seconds(60)), Ok(()));
        assert_eq!(validate_claims(&c, at(950), Duration::seconds(60)), Ok(()));
    }

    #[test]
    fn future_nbf_is_rejected() {
        let c = claims(json!({"nbf": 1_800, "exp": 2_000}));
        assert_eq!(
            validate_claims(&c, at(1_500), Duration::zero()),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let c = claims(json!({"iat": 2_000, "exp": 2_000}));
        assert_eq!(
            validate_claims(&c, at(1_500), Duration::zero()),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn non_numeric_exp_is_malformed() {
        let c = claims(json!({"exp": "tomorrow"}));
        assert!(matches!(
            validate_claims(&c, at(1_500), Duration::zero()),
            Err(TokenValidationError::Malformed(_))
        ));
    }

    #[test]
    fn fractional_exp_is_accepted() {
        let c = claims(json!({"exp": 2_000.75}));
        assert_eq!(validate_claims(&c, at(1_999), Duration::zero()), Ok(()));
    }
}
