use serde::{Deserialize, Serialize};

use crate::group::{GroupName, group_name_from_dn};

/// Ordered group names for one user, exactly as the directory listed them.
///
/// No sorting or de-duplication is applied.
pub type EntitlementsResult = Vec<GroupName>;

/// One directory entry returned by an account search.
///
/// Only the `member-of` values matter for entitlements; an entry without the
/// attribute is represented by an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    #[serde(default)]
    pub member_of: Vec<String>,
}

impl DirectoryRecord {
    pub fn new(member_of: Vec<String>) -> Self {
        Self { member_of }
    }

    /// Group names of this record, in directory order.
    pub fn group_names(&self) -> Vec<GroupName> {
        self.member_of.iter().map(|dn| group_name_from_dn(dn)).collect()
    }
}

/// Pick the entitlements of the first matching record.
///
/// Account searches are expected to match at most one entry; any further
/// matches are ignored. No match means no entitlements.
pub fn first_record_groups(per_record: Vec<Vec<GroupName>>) -> EntitlementsResult {
    per_record.into_iter().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_groups_keep_directory_order() {
        let record = DirectoryRecord::new(vec![
            "CN=Group1,OU=X".to_string(),
            "CN=Group2,OU=Y".to_string(),
        ]);
        assert_eq!(
            record.group_names(),
            vec![GroupName::new("Group1"), GroupName::new("Group2")]
        );
    }

    #[test]
    fn duplicates_are_passed_through() {
        let record = DirectoryRecord::new(vec![
            "CN=Ops,OU=A".to_string(),
            "CN=Ops,OU=B".to_string(),
        ]);
        assert_eq!(record.group_names().len(), 2);
    }

    #[test]
    fn record_without_member_of_has_no_groups() {
        assert!(DirectoryRecord::default().group_names().is_empty());
    }

    #[test]
    fn first_record_wins() {
        let groups = first_record_groups(vec![
            vec![GroupName::new("A")],
            vec![GroupName::new("B")],
        ]);
        assert_eq!(groups, vec![GroupName::new("A")]);
    }

    #[test]
    fn no_records_means_no_entitlements() {
        assert!(first_record_groups(vec![]).is_empty());
    }

    #[test]
    fn result_serializes_as_string_array() {
        let result: EntitlementsResult = vec![GroupName::new("Admins")];
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"["Admins"]"#);
    }
}
