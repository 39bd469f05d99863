//! Document metadata: visibility and classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who can see a document absent any explicit grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the owner and explicitly granted principals
    Private,
    /// Owner plus explicitly granted groups
    Group,
    /// Every user in the document's tenant
    Tenant,
    /// Anyone
    Public,
}

impl Visibility {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Group => "group",
            Visibility::Tenant => "tenant",
            Visibility::Public => "public",
        }
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "private" => Some(Visibility::Private),
            "group" => Some(Visibility::Group),
            "tenant" => Some(Visibility::Tenant),
            "public" => Some(Visibility::Public),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data classification level
///
/// Ordered by sensitivity. Classification can override normal ACL
/// resolution entirely: restricted documents are blocked before any entry
/// is consulted unless the request carries the required evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Public,
    Internal,
    Confidential,
    Restricted,
}

impl Classification {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Classification::Public => "public",
            Classification::Internal => "internal",
            Classification::Confidential => "confidential",
            Classification::Restricted => "restricted",
        }
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Classification::Public),
            "internal" => Some(Classification::Internal),
            "confidential" => Some(Classification::Confidential),
            "restricted" => Some(Classification::Restricted),
            _ => None,
        }
    }

    /// Get all classification levels, least sensitive first
    pub const fn all() -> &'static [Classification] {
        &[
            Classification::Public,
            Classification::Internal,
            Classification::Confidential,
            Classification::Restricted,
        ]
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document metadata as seen by the ACL subsystem
///
/// Created at ingestion time by an external collaborator; this subsystem
/// mutates metadata only and never deletes documents on its own. The owner
/// implicitly holds `admin` and that right cannot be revoked by any entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub tenant_id: String,
    pub visibility: Visibility,
    pub classification: Classification,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        tenant_id: impl Into<String>,
        visibility: Visibility,
        classification: Classification,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            tenant_id: tenant_id.into(),
            visibility,
            classification,
        }
    }

    /// Check whether a user id is the document's owner
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}
