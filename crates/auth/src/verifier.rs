//! Signature, issuer and audience verification of bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::claims::{Claims, TokenValidationError, validate_claims};

/// Capability that turns a raw bearer token into a verified claim set.
///
/// The HTTP layer only depends on this trait, so tests can swap in a stub.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError>;
}

/// Key material used to check token signatures.
#[derive(Clone)]
pub enum VerificationKey {
    /// Shared secret for the HMAC family (`HS256`, `HS384`, `HS512`).
    Secret(Vec<u8>),
    /// PEM-encoded public key for the RSA / ECDSA families.
    PublicKeyPem(Vec<u8>),
}

impl core::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Secret(_) => f.write_str("Secret(<redacted>)"),
            Self::PublicKeyPem(_) => f.write_str("PublicKeyPem(..)"),
        }
    }
}

/// Settings for [`JwtTokenVerifier`].
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub algorithm: Algorithm,
    pub key: VerificationKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway: Duration,
}

impl JwtSettings {
    /// HMAC settings with no issuer/audience pinning.
    pub fn hs256(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            key: VerificationKey::Secret(secret.into()),
            issuer: None,
            audience: None,
            leeway: Duration::seconds(60),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }
}

/// JWT verifier backed by `jsonwebtoken`.
///
/// `jsonwebtoken` checks the signature, `iss` and `aud`; the time window is
/// checked by [`validate_claims`] against the caller-supplied clock.
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
    leeway: Duration,
}

impl JwtTokenVerifier {
    pub fn new(settings: JwtSettings) -> Result<Self, TokenValidationError> {
        let key = decoding_key(settings.algorithm, &settings.key)?;

        let mut validation = Validation::new(settings.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();
        match &settings.issuer {
            Some(iss) => validation.set_issuer(&[iss]),
            None => validation.iss = None,
        }
        match &settings.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            key,
            validation,
            leeway: settings.leeway,
        })
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
        let data = jsonwebtoken::decode::<Map<String, Value>>(token, &self.key, &self.validation)
            .map_err(map_jwt_error)?;

        let claims = Claims::new(data.claims);
        validate_claims(&claims, now, self.leeway)?;

        tracing::debug!(sub = claims.subject().unwrap_or("<none>"), "token verified");
        Ok(claims)
    }
}

fn decoding_key(algorithm: Algorithm, key: &VerificationKey) -> Result<DecodingKey, TokenValidationError> {
    use Algorithm::*;

    let key_err = |e: jsonwebtoken::errors::Error| TokenValidationError::Key(e.to_string());
    match (algorithm, key) {
        (HS256 | HS384 | HS512, VerificationKey::Secret(secret)) => Ok(DecodingKey::from_secret(secret)),
        (RS256 | RS384 | RS512 | PS256 | PS384 | PS512, VerificationKey::PublicKeyPem(pem)) => {
            DecodingKey::from_rsa_pem(pem).map_err(key_err)
        }
        (ES256 | ES384, VerificationKey::PublicKeyPem(pem)) => DecodingKey::from_ec_pem(pem).map_err(key_err),
        (EdDSA, VerificationKey::PublicKeyPem(pem)) => DecodingKey::from_ed_pem(pem).map_err(key_err),
        (alg, key) => Err(TokenValidationError::Key(format!(
            "{alg:?} cannot be used with {key:?}"
        ))),
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenValidationError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenValidationError::InvalidSignature,
        ErrorKind::InvalidIssuer => TokenValidationError::InvalidIssuer,
        ErrorKind::InvalidAudience => TokenValidationError::InvalidAudience,
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => TokenValidationError::UnsupportedAlgorithm,
        ErrorKind::MissingRequiredClaim(name) => TokenValidationError::MissingClaim(name.clone()),
        ErrorKind::ExpiredSignature => TokenValidationError::Expired,
        ErrorKind::ImmatureSignature => TokenValidationError::NotYetValid,
        _ => TokenValidationError::Malformed(err.to_string()),
    }
}
