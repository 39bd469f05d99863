//! Classification rules and the pre-ACL check

use crate::model::Classification;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use tracing::trace;

/// Evidence attached to a single request
///
/// Consumed by the classification pre-check and recorded in the audit
/// actor block. The engine does not verify MFA itself — it trusts the
/// upstream auth service's assertion, the same way it trusts principal
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Upstream MFA assertion for this session
    #[serde(default)]
    pub mfa_verified: bool,

    /// Free-text justification supplied by the caller
    #[serde(default)]
    pub justification: Option<String>,

    /// Caller address, recorded in audit records when present
    #[serde(default)]
    pub source_ip: Option<IpAddr>,
}

impl RequestContext {
    /// Context with an MFA assertion
    pub fn mfa() -> Self {
        Self {
            mfa_verified: true,
            ..Self::default()
        }
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }

    fn has_justification(&self) -> bool {
        self.justification
            .as_deref()
            .is_some_and(|j| !j.trim().is_empty())
    }
}

/// Override rules for one classification level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationRule {
    /// Require an MFA assertion on every access
    pub require_mfa: bool,

    /// Require a non-empty justification string on every access
    pub require_justification: bool,

    /// Cap on the number of ACL entries per document (enforced at grant
    /// time by the store, not at evaluation time)
    pub max_acl_entries: Option<usize>,

    /// Force audit logging at elevated severity
    pub log_all_access: bool,

    /// Forbid exporting document content outside the platform
    pub prohibit_export: bool,
}

/// Why the pre-check blocked a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreCheckBlock {
    MfaRequired,
    JustificationRequired,
}

impl PreCheckBlock {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PreCheckBlock::MfaRequired => "mfa_required",
            PreCheckBlock::JustificationRequired => "justification_required",
        }
    }
}

/// Table of classification rules, one per level
///
/// Statically configured and rarely mutated. Absent overrides fall back to
/// the built-in defaults: restricted requires MFA plus justification with a
/// tight entry cap, confidential requires MFA, internal and public have no
/// pre-checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationPolicy {
    rules: HashMap<Classification, ClassificationRule>,
}

impl ClassificationPolicy {
    /// Build a policy from explicit per-level rules; missing levels use the
    /// built-in defaults
    pub fn new(overrides: HashMap<Classification, ClassificationRule>) -> Self {
        let mut policy = Self::default();
        policy.rules.extend(overrides);
        policy
    }

    /// Rule for a classification level
    pub fn rule(&self, level: Classification) -> ClassificationRule {
        self.rules.get(&level).copied().unwrap_or_default()
    }

    /// ACL entry cap for a level, if any
    pub fn max_entries(&self, level: Classification) -> Option<usize> {
        self.rule(level).max_acl_entries
    }

    /// Whether every access at this level must be logged at elevated
    /// severity
    pub fn log_all_access(&self, level: Classification) -> bool {
        self.rule(level).log_all_access
    }

    /// Pre-ACL check: does the request carry the evidence the level
    /// requires?
    ///
    /// Returns the first missing piece of evidence, or `None` when the
    /// request may proceed to normal ACL resolution.
    pub fn pre_check(
        &self,
        level: Classification,
        ctx: &RequestContext,
    ) -> Option<PreCheckBlock> {
        let rule = self.rule(level);

        if rule.require_mfa && !ctx.mfa_verified {
            trace!(classification = %level, "Pre-check blocked: MFA required");
            return Some(PreCheckBlock::MfaRequired);
        }
        if rule.require_justification && !ctx.has_justification() {
            trace!(classification = %level, "Pre-check blocked: justification required");
            return Some(PreCheckBlock::JustificationRequired);
        }
        None
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            Classification::Restricted,
            ClassificationRule {
                require_mfa: true,
                require_justification: true,
                max_acl_entries: Some(10),
                log_all_access: true,
                prohibit_export: true,
            },
        );
        rules.insert(
            Classification::Confidential,
            ClassificationRule {
                require_mfa: true,
                require_justification: false,
                max_acl_entries: Some(50),
                log_all_access: true,
                prohibit_export: false,
            },
        );
        rules.insert(Classification::Internal, ClassificationRule::default());
        rules.insert(Classification::Public, ClassificationRule::default());
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_has_no_pre_check() {
        let policy = ClassificationPolicy::default();
        let ctx = RequestContext::default();
        assert_eq!(policy.pre_check(Classification::Internal, &ctx), None);
        assert_eq!(policy.pre_check(Classification::Public, &ctx), None);
    }

    #[test]
    fn test_confidential_requires_mfa_only() {
        let policy = ClassificationPolicy::default();

        assert_eq!(
            policy.pre_check(Classification::Confidential, &RequestContext::default()),
            Some(PreCheckBlock::MfaRequired)
        );
        assert_eq!(
            policy.pre_check(Classification::Confidential, &RequestContext::mfa()),
            None
        );
    }

    #[test]
    fn test_restricted_requires_mfa_and_justification() {
        let policy = ClassificationPolicy::default();

        assert_eq!(
            policy.pre_check(Classification::Restricted, &RequestContext::mfa()),
            Some(PreCheckBlock::JustificationRequired)
        );

        // Whitespace-only justification does not count
        let blank = RequestContext::mfa().with_justification("   ");
        assert_eq!(
            policy.pre_check(Classification::Restricted, &blank),
            Some(PreCheckBlock::JustificationRequired)
        );

        let ok = RequestContext::mfa().with_justification("ticket INC-421");
        assert_eq!(policy.pre_check(Classification::Restricted, &ok), None);
    }

    #[test]
    fn test_entry_caps() {
        let policy = ClassificationPolicy::default();
        assert_eq!(policy.max_entries(Classification::Restricted), Some(10));
        assert_eq!(policy.max_entries(Classification::Confidential), Some(50));
        assert_eq!(policy.max_entries(Classification::Internal), None);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert(
            Classification::Internal,
            ClassificationRule {
                require_mfa: true,
                ..Default::default()
            },
        );
        let policy = ClassificationPolicy::new(overrides);

        assert_eq!(
            policy.pre_check(Classification::Internal, &RequestContext::default()),
            Some(PreCheckBlock::MfaRequired)
        );
        // Untouched levels keep their defaults
        assert!(policy.rule(Classification::Restricted).require_justification);
    }
}
