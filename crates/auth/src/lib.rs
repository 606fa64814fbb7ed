//! `idgate-auth` — bearer token verification boundary.
//!
//! This crate is intentionally decoupled from HTTP: it turns a raw token
//! string into a verified claim set, or says why it cannot.

pub mod claims;
pub mod verifier;

pub use claims::{Claims, TokenValidationError, validate_claims};
pub use verifier::{JwtSettings, JwtTokenVerifier, TokenVerifier, VerificationKey};
