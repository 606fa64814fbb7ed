use serde::{Deserialize, Serialize};

use idgate_core::ValueObject;

/// Attribute-type marker removed from the leading component of a group DN.
pub const COMMON_NAME_PREFIX: &str = "CN=";

/// Short group identifier extracted from a distinguished name.
///
/// `CN=Finance,OU=Groups,DC=corp,DC=com` becomes `Finance`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for GroupName {}

impl core::fmt::Display for GroupName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Extract a group name from a `member-of` distinguished name.
///
/// Takes everything before the first `,` (the whole value when there is none)
/// and removes every case-sensitive `CN=` in it. This is not a DN parser:
/// escaped commas and other attribute types pass through untouched, e.g.
/// `OU=Ops,DC=x` yields `OU=Ops` and `cn=ops` stays `cn=ops`.
pub fn group_name_from_dn(dn: &str) -> GroupName {
    let leading = dn.split(',').next().unwrap_or_default();
    GroupName::new(leading.replace(COMMON_NAME_PREFIX, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_common_name_from_full_dn() {
        assert_eq!(
            group_name_from_dn("CN=Finance,OU=Groups,DC=corp,DC=com"),
            GroupName::new("Finance")
        );
    }

    #[test]
    fn value_without_comma_is_taken_whole() {
        assert_eq!(group_name_from_dn("CN=Admins"), GroupName::new("Admins"));
    }

    #[test]
    fn other_attribute_types_are_kept() {
        assert_eq!(group_name_from_dn("OU=Ops,DC=corp"), GroupName::new("OU=Ops"));
        assert_eq!(group_name_from_dn("cn=ops,DC=corp"), GroupName::new("cn=ops"));
    }

    #[test]
    fn every_marker_in_the_leading_component_is_removed() {
        assert_eq!(group_name_from_dn("CN=CN=x,OU=y"), GroupName::new("x"));
        assert_eq!(group_name_from_dn("OU=CN=Ops,DC=corp"), GroupName::new("OU=Ops"));
        assert_eq!(group_name_from_dn("CN=Finance,CN=Users"), GroupName::new("Finance"));
    }

    #[test]
    fn escaped_comma_still_splits() {
        assert_eq!(
            group_name_from_dn(r"CN=Smith\, John,OU=People"),
            GroupName::new(r"Smith\")
        );
    }

    #[test]
    fn empty_input_yields_empty_name() {
        assert_eq!(group_name_from_dn(""), GroupName::new(""));
        assert_eq!(group_name_from_dn(",OU=x"), GroupName::new(""));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&GroupName::new("Admins")).unwrap();
        assert_eq!(json, "\"Admins\"");
    }

    proptest! {
        #[test]
        fn trailing_components_never_change_the_name(
            name in "[A-Za-z0-9 _-]{1,24}",
            tail in proptest::collection::vec("(OU|DC|O)=[A-Za-z0-9]{1,12}", 0..5),
        ) {
            let mut dn = format!("CN={name}");
            for rdn in &tail {
                dn.push(',');
                dn.push_str(rdn);
            }
            prop_assert_eq!(group_name_from_dn(&dn), GroupName::new(name.clone()));
        }

        #[test]
        fn result_never_contains_a_comma_or_marker(dn in ".{0,64}") {
            let name = group_name_from_dn(&dn);
            prop_assert!(!name.as_str().contains(','));
            prop_assert!(!name.as_str().contains(COMMON_NAME_PREFIX));
        }
    }
}
