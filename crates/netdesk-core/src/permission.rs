// ── Permission evaluator ──
//
// Pure set arithmetic over a closed vocabulary of `<resource>:<action>`
// tags. Only decides what the console shows; the server enforces
// authorization independently.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

/// One grantable capability.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    AsRefStr,
)]
pub enum Permission {
    #[serde(rename = "packages:view")]
    #[strum(serialize = "packages:view")]
    PackagesView,
    #[serde(rename = "packages:create")]
    #[strum(serialize = "packages:create")]
    PackagesCreate,
    #[serde(rename = "packages:edit")]
    #[strum(serialize = "packages:edit")]
    PackagesEdit,
    #[serde(rename = "packages:delete")]
    #[strum(serialize = "packages:delete")]
    PackagesDelete,
    #[serde(rename = "packages:stats")]
    #[strum(serialize = "packages:stats")]
    PackagesStats,
    #[serde(rename = "routers:view")]
    #[strum(serialize = "routers:view")]
    RoutersView,
}

/// A tag outside the permission vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::iter()
            .find(|p| p.as_ref() == tag)
            .ok_or_else(|| UnknownPermission(tag.to_owned()))
    }
}

// ── Granted set ─────────────────────────────────────────────────────

/// Permissions granted to the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self(permissions.into_iter().collect())
    }

    /// Every permission in the vocabulary.
    pub fn all() -> Self {
        Self(Permission::iter().collect())
    }

    /// Parse a list of string tags, failing on the first unknown one.
    pub fn from_tags<I, S>(tags: I) -> Result<Self, UnknownPermission>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .map(|t| t.as_ref().parse::<Permission>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// True when `permissions` is non-empty and shares at least one
    /// element with this set.
    pub fn can_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.can(*p))
    }

    /// True when `permissions` is non-empty and fully contained in this set.
    pub fn can_all(&self, permissions: &[Permission]) -> bool {
        !permissions.is_empty() && permissions.iter().all(|p| self.can(*p))
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ── Requests ────────────────────────────────────────────────────────

/// A permission predicate in one of three shapes.
///
/// When several shapes are populated the first present one decides:
/// `permission`, then `any_of`, then `all_of`. A request with no shape
/// at all evaluates to `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Permission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Permission>>,
}

impl PermissionRequest {
    pub fn single(permission: Permission) -> Self {
        Self {
            permission: Some(permission),
            ..Self::default()
        }
    }

    pub fn any_of(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            any_of: Some(permissions.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn all_of(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            all_of: Some(permissions.into_iter().collect()),
            ..Self::default()
        }
    }

    /// The request with no predicate.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.permission.is_none() && self.any_of.is_none() && self.all_of.is_none()
    }

    pub fn evaluate(&self, granted: &PermissionSet) -> bool {
        if let Some(p) = self.permission {
            return granted.can(p);
        }
        if let Some(list) = &self.any_of {
            return granted.can_any(list);
        }
        if let Some(list) = &self.all_of {
            return granted.can_all(list);
        }
        true
    }
}

impl From<Permission> for PermissionRequest {
    fn from(permission: Permission) -> Self {
        Self::single(permission)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use Permission::{PackagesDelete, PackagesEdit, PackagesStats, PackagesView, RoutersView};

    fn granted() -> PermissionSet {
        PermissionSet::new([PackagesView, PackagesEdit])
    }

    #[test]
    fn single_is_membership() {
        assert!(PermissionRequest::single(PackagesView).evaluate(&granted()));
        assert!(!PermissionRequest::single(PackagesDelete).evaluate(&granted()));
    }

    #[test]
    fn any_of_needs_one_match() {
        let set = granted();
        assert!(PermissionRequest::any_of([PackagesDelete, PackagesEdit]).evaluate(&set));
        assert!(!PermissionRequest::any_of([PackagesDelete, RoutersView]).evaluate(&set));
    }

    #[test]
    fn all_of_needs_every_match() {
        let set = granted();
        assert!(PermissionRequest::all_of([PackagesView, PackagesEdit]).evaluate(&set));
        assert!(!PermissionRequest::all_of([PackagesView, PackagesDelete]).evaluate(&set));
    }

    #[test]
    fn empty_lists_deny() {
        let set = PermissionSet::all();
        assert!(!PermissionRequest::any_of(Vec::new()).evaluate(&set));
        assert!(!PermissionRequest::all_of(Vec::new()).evaluate(&set));
        assert!(!set.can_any(&[]));
        assert!(!set.can_all(&[]));
    }

    #[test]
    fn no_shape_allows() {
        assert!(PermissionRequest::unconstrained().evaluate(&PermissionSet::default()));
        assert!(PermissionRequest::default().is_unconstrained());
    }

    #[test]
    fn single_takes_precedence_over_lists() {
        let request = PermissionRequest {
            permission: Some(PackagesDelete),
            any_of: Some(vec![PackagesView]),
            all_of: None,
        };
        assert!(!request.evaluate(&granted()));

        let request = PermissionRequest {
            permission: None,
            any_of: Some(vec![PackagesView]),
            all_of: Some(vec![PackagesDelete]),
        };
        assert!(request.evaluate(&granted()));
    }

    #[test]
    fn tags_parse_and_render() {
        assert_eq!("packages:stats".parse::<Permission>().unwrap(), PackagesStats);
        assert_eq!(RoutersView.to_string(), "routers:view");
        assert_eq!(
            "packages:*".parse::<Permission>(),
            Err(UnknownPermission("packages:*".into()))
        );
    }

    #[test]
    fn set_from_tags_rejects_unknown() {
        let set = PermissionSet::from_tags(["packages:view", "routers:view"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.can(RoutersView));
        assert!(PermissionSet::from_tags(["admin"]).is_err());
    }

    #[test]
    fn set_serializes_as_tag_list() {
        let json = serde_json::to_value(granted()).unwrap();
        assert_eq!(json, serde_json::json!(["packages:view", "packages:edit"]));
        let back: PermissionSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, granted());
    }

    #[test]
    fn full_vocabulary() {
        assert_eq!(PermissionSet::all().len(), 6);
    }
}
