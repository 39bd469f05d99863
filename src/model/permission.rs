//! Permission levels and principal types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission level on a document
///
/// Levels form a total order: `admin ⊇ share ⊇ write ⊇ read`. A grant at
/// one level satisfies requests at that level and every level below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Share,
    Admin,
}

impl Permission {
    /// Check whether this level satisfies a requested level
    pub const fn satisfies(&self, requested: Permission) -> bool {
        *self as u8 >= requested as u8
    }

    /// Get the permission name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Share => "share",
            Permission::Admin => "admin",
        }
    }

    /// Try to parse a permission from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Permission::Read),
            "write" => Some(Permission::Write),
            "share" => Some(Permission::Share),
            "admin" => Some(Permission::Admin),
            _ => None,
        }
    }

    /// Get all permission levels, lowest first
    pub const fn all() -> &'static [Permission] {
        &[
            Permission::Read,
            Permission::Write,
            Permission::Share,
            Permission::Admin,
        ]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of principal an ACL entry addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalType {
    /// A single user, addressed by user id
    User,
    /// Every member of a group, addressed by group id
    Group,
    /// Every holder of a role, addressed by the role's canonical name
    Role,
    /// Every user of the document's tenant
    Tenant,
    /// Anyone
    Public,
}

impl PrincipalType {
    /// Get the principal type name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            PrincipalType::User => "user",
            PrincipalType::Group => "group",
            PrincipalType::Role => "role",
            PrincipalType::Tenant => "tenant",
            PrincipalType::Public => "public",
        }
    }

    /// Try to parse a principal type from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(PrincipalType::User),
            "group" => Some(PrincipalType::Group),
            "role" => Some(PrincipalType::Role),
            "tenant" => Some(PrincipalType::Tenant),
            "public" => Some(PrincipalType::Public),
            _ => None,
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
