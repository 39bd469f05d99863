//! Decision types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable reason code attached to every decision
///
/// Reason codes are part of the API: consumers branch on them (a UI
/// explaining "requires justification" keys off `classification_blocked`)
/// and every audit record carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Blocked by the classification pre-check; no entry was consulted
    ClassificationBlocked,
    /// A deny entry names this principal
    ExplicitDeny,
    /// The principal owns the document
    Owner,
    /// A direct user grant of sufficient level
    ExplicitUser,
    /// A grant to one of the principal's groups
    GroupMembership,
    /// A grant to one of the principal's roles
    RoleBased,
    /// Tenant-wide visibility or an explicit tenant grant
    TenantDefault,
    /// Public visibility or an explicit public grant
    VisibilityPublic,
    /// Nothing matched
    ImplicitDeny,
}

impl ReasonCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::ClassificationBlocked => "classification_blocked",
            ReasonCode::ExplicitDeny => "explicit_deny",
            ReasonCode::Owner => "owner",
            ReasonCode::ExplicitUser => "explicit_user",
            ReasonCode::GroupMembership => "group_membership",
            ReasonCode::RoleBased => "role_based",
            ReasonCode::TenantDefault => "tenant_default",
            ReasonCode::VisibilityPublic => "visibility_public",
            ReasonCode::ImplicitDeny => "implicit_deny",
        }
    }

    /// Try to parse a reason code from its stable string form
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "classification_blocked" => Some(ReasonCode::ClassificationBlocked),
            "explicit_deny" => Some(ReasonCode::ExplicitDeny),
            "owner" => Some(ReasonCode::Owner),
            "explicit_user" => Some(ReasonCode::ExplicitUser),
            "group_membership" => Some(ReasonCode::GroupMembership),
            "role_based" => Some(ReasonCode::RoleBased),
            "tenant_default" => Some(ReasonCode::TenantDefault),
            "visibility_public" => Some(ReasonCode::VisibilityPublic),
            "implicit_deny" => Some(ReasonCode::ImplicitDeny),
            _ => None,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    pub reason: ReasonCode,
}

impl Verdict {
    pub const fn allow(reason: ReasonCode) -> Self {
        Self {
            decision: Decision::Allow,
            reason,
        }
    }

    pub const fn deny(reason: ReasonCode) -> Self {
        Self {
            decision: Decision::Deny,
            reason,
        }
    }

    pub const fn is_allowed(&self) -> bool {
        matches!(self.decision, Decision::Allow)
    }

    pub const fn is_denied(&self) -> bool {
        matches!(self.decision, Decision::Deny)
    }
}
