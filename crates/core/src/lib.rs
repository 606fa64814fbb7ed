//! `idgate-core` — value types shared by every gateway crate.
//!
//! Nothing in here performs IO; transport and directory concerns live in
//! `idgate-api` and `idgate-infra`.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::DomainError;
pub use id::UserIdentifier;
pub use value_object::ValueObject;
