//! Resolved principals, roles, and the role permission matrix

use crate::model::Permission;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Assignable role
///
/// Roles are a closed enumeration. ACL entries address roles by their
/// canonical string form; anything that does not parse is rejected at
/// grant time, so the evaluator never sees an unknown role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Contributor,
    Maintainer,
    Auditor,
    TenantAdmin,
}

impl Role {
    /// Get the role name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Contributor => "contributor",
            Role::Maintainer => "maintainer",
            Role::Auditor => "auditor",
            Role::TenantAdmin => "tenant_admin",
        }
    }

    /// Try to parse a role from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "viewer" => Some(Role::Viewer),
            "contributor" => Some(Role::Contributor),
            "maintainer" => Some(Role::Maintainer),
            "auditor" => Some(Role::Auditor),
            "tenant_admin" => Some(Role::TenantAdmin),
            _ => None,
        }
    }

    /// Get all roles
    pub const fn all() -> &'static [Role] {
        &[
            Role::Viewer,
            Role::Contributor,
            Role::Maintainer,
            Role::Auditor,
            Role::TenantAdmin,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Versioned role permission matrix
///
/// Caps what a role-addressed grant can confer: an entry granting a role
/// permission P is effective at `min(P, ceiling(role))`. The matrix is
/// passed into the evaluation engine explicitly, never looked up from
/// ambient configuration, so the evaluator stays a pure function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMatrix {
    /// Monotonically increased whenever ceilings change
    pub version: u32,
    /// Per-role permission ceiling; absent roles default to `admin`
    pub ceilings: HashMap<Role, Permission>,
}

impl RoleMatrix {
    pub fn new(version: u32, ceilings: HashMap<Role, Permission>) -> Self {
        Self { version, ceilings }
    }

    /// Permission ceiling for a role
    pub fn ceiling(&self, role: Role) -> Permission {
        self.ceilings.get(&role).copied().unwrap_or(Permission::Admin)
    }
}

impl Default for RoleMatrix {
    fn default() -> Self {
        // Audit-only roles can never be escalated by a misconfigured grant.
        let mut ceilings = HashMap::new();
        ceilings.insert(Role::Auditor, Permission::Read);
        Self {
            version: 1,
            ceilings,
        }
    }
}

/// Resolved view of a requester
///
/// Supplied by the principal directory and immutable for the duration of
/// one evaluation. Roles and group ids are B-tree sets so iteration order
/// is stable, which makes reason reporting deterministic when several
/// entries could satisfy a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub group_ids: BTreeSet<String>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: tenant_id.into(),
            roles: BTreeSet::new(),
            group_ids: BTreeSet::new(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_ids.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Check membership in a group
    pub fn in_group(&self, group_id: &str) -> bool {
        self.group_ids.contains(group_id)
    }

    /// Check whether the principal holds a role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in Role::all() {
            assert_eq!(Role::try_parse(role.as_str()), Some(*role));
        }
        assert!(Role::try_parse("superuser").is_none());
    }

    #[test]
    fn test_matrix_default_caps_auditor() {
        let matrix = RoleMatrix::default();
        assert_eq!(matrix.ceiling(Role::Auditor), Permission::Read);
        assert_eq!(matrix.ceiling(Role::Maintainer), Permission::Admin);
    }

    #[test]
    fn test_group_iteration_is_lexicographic() {
        let principal = Principal::new("u1", "t1").with_groups(["zeta", "alpha", "mid"]);
        let order: Vec<&str> = principal.group_ids.iter().map(String::as_str).collect();
        assert_eq!(order, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_membership_helpers() {
        let principal = Principal::new("u1", "t1")
            .with_roles([Role::Viewer])
            .with_groups(["finance"]);
        assert!(principal.in_group("finance"));
        assert!(!principal.in_group("eng"));
        assert!(principal.has_role(Role::Viewer));
        assert!(!principal.has_role(Role::Auditor));
    }
}
