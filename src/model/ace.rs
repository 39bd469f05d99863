//! Access-control entries

use crate::model::{Permission, Principal, PrincipalType, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an entry grants or denies
///
/// A deny entry is total: it blocks every permission level for the named
/// principal and wins over every grant, including ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AceEffect {
    Grant,
    Deny,
}

/// A single grant or deny binding a principal to a permission level on one
/// document
///
/// Uniqueness invariant: at most one entry per
/// `(document_id, principal_type, principal_id)` — a new grant for the same
/// principal replaces the prior one. An expired entry is treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessControlEntry {
    pub document_id: String,
    pub principal_type: PrincipalType,
    pub principal_id: String,
    pub effect: AceEffect,
    pub permission: Permission,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessControlEntry {
    /// Build a grant entry
    pub fn grant(
        document_id: impl Into<String>,
        principal_type: PrincipalType,
        principal_id: impl Into<String>,
        permission: Permission,
        granted_by: impl Into<String>,
        granted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            principal_type,
            principal_id: principal_id.into(),
            effect: AceEffect::Grant,
            permission,
            granted_by: granted_by.into(),
            granted_at,
            expires_at: None,
        }
    }

    /// Build a deny entry
    pub fn deny(
        document_id: impl Into<String>,
        principal_type: PrincipalType,
        principal_id: impl Into<String>,
        granted_by: impl Into<String>,
        granted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            principal_type,
            principal_id: principal_id.into(),
            effect: AceEffect::Deny,
            // A deny blocks every level; the stored permission is nominal.
            permission: Permission::Read,
            granted_by: granted_by.into(),
            granted_at,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check whether the entry has expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Entry key identity: same document, principal type, and principal id
    pub fn same_principal(&self, principal_type: PrincipalType, principal_id: &str) -> bool {
        self.principal_type == principal_type && self.principal_id == principal_id
    }

    /// Check whether this entry addresses the given resolved principal —
    /// by user id, by any of its group ids, or by any of its roles.
    ///
    /// Tenant and public entries are NOT matched here: those are visibility
    /// defaults evaluated separately, not principal-addressed entries.
    pub fn addresses(&self, principal: &Principal) -> bool {
        match self.principal_type {
            PrincipalType::User => self.principal_id == principal.user_id,
            PrincipalType::Group => principal.in_group(&self.principal_id),
            PrincipalType::Role => {
                Role::try_parse(&self.principal_id).is_some_and(|role| principal.has_role(role))
            }
            PrincipalType::Tenant | PrincipalType::Public => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_expiry() {
        let entry = AccessControlEntry::grant(
            "doc-1",
            PrincipalType::User,
            "bob",
            Permission::Read,
            "alice",
            now(),
        );
        assert!(!entry.is_expired(now()));

        let expired = entry.clone().with_expiry(now() - Duration::hours(1));
        assert!(expired.is_expired(now()));

        let future = entry.with_expiry(now() + Duration::hours(1));
        assert!(!future.is_expired(now()));
    }

    #[test]
    fn test_addresses_user_group_role() {
        let principal = Principal::new("bob", "acme")
            .with_groups(["finance"])
            .with_roles([Role::Auditor]);

        let by_user = AccessControlEntry::grant(
            "doc-1",
            PrincipalType::User,
            "bob",
            Permission::Read,
            "alice",
            now(),
        );
        assert!(by_user.addresses(&principal));

        let by_group = AccessControlEntry::grant(
            "doc-1",
            PrincipalType::Group,
            "finance",
            Permission::Read,
            "alice",
            now(),
        );
        assert!(by_group.addresses(&principal));

        let by_role = AccessControlEntry::grant(
            "doc-1",
            PrincipalType::Role,
            "auditor",
            Permission::Read,
            "alice",
            now(),
        );
        assert!(by_role.addresses(&principal));

        let other_user = AccessControlEntry::grant(
            "doc-1",
            PrincipalType::User,
            "carol",
            Permission::Read,
            "alice",
            now(),
        );
        assert!(!other_user.addresses(&principal));
    }

    #[test]
    fn test_tenant_and_public_entries_do_not_address_principals() {
        let principal = Principal::new("bob", "acme");
        let tenant_entry = AccessControlEntry::grant(
            "doc-1",
            PrincipalType::Tenant,
            "acme",
            Permission::Read,
            "alice",
            now(),
        );
        assert!(!tenant_entry.addresses(&principal));
    }
}
