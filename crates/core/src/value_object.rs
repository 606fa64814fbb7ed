//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Every type the gateway passes between layers (user identifiers, group
/// names) is a value object: immutable, cloned freely, compared by content.
/// Two `GroupName`s extracted from different DNs are equal when their text is.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct GroupName(String);
///
/// impl ValueObject for GroupName {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
