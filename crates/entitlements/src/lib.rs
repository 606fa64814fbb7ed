//! Entitlements domain module.
//!
//! Pure rules for turning directory `member-of` values into group names
//! (no IO, no HTTP, no directory client).

pub mod group;
pub mod record;

pub use group::{GroupName, group_name_from_dn};
pub use record::{DirectoryRecord, EntitlementsResult, first_record_groups};
