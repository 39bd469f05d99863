//! Audit records and the hash chain

use crate::engine::{Decision, ReasonCode};
use crate::model::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

/// Previous-hash value of the first record in a tenant chain
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// What kind of operation a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    CheckAccess,
    Grant,
    Revoke,
}

impl AuditAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CheckAccess => "check_access",
            AuditAction::Grant => "grant",
            AuditAction::Revoke => "revoke",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who performed the audited operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInfo {
    pub user_id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub ip: Option<IpAddr>,
}

impl ActorInfo {
    pub fn new(user_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: tenant_id.into(),
            roles: BTreeSet::new(),
            ip: None,
        }
    }
}

/// A record before it has been chained
///
/// The logger assigns the id, computes the hash against the tenant's
/// current head, and returns the sealed [`AuditRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDraft {
    pub timestamp: DateTime<Utc>,
    pub actor: ActorInfo,
    pub action: AuditAction,
    pub resource_id: String,
    pub decision: Decision,
    pub reason_code: ReasonCode,
}

/// One sealed link of a tenant's audit chain
///
/// Append-only: records are never updated or deleted. `hash` is the
/// SHA-256 digest of the record's canonical JSON bytes concatenated with
/// `previous_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub actor: ActorInfo,
    pub action: AuditAction,
    pub resource_id: String,
    pub decision: Decision,
    pub reason_code: ReasonCode,
    pub hash: String,
    pub previous_hash: String,
}

/// Canonical view hashed into the chain: every field except the hash pair.
/// Field order is fixed by this struct, so the digest is deterministic.
#[derive(Serialize)]
struct CanonicalRecord<'a> {
    id: &'a Uuid,
    timestamp: &'a DateTime<Utc>,
    actor: &'a ActorInfo,
    action: &'a AuditAction,
    resource_id: &'a str,
    decision: &'a Decision,
    reason_code: &'a ReasonCode,
}

impl AuditRecord {
    /// Seal a draft against the chain head
    pub fn seal(draft: AuditDraft, id: Uuid, previous_hash: &str) -> serde_json::Result<Self> {
        let mut record = Self {
            id,
            timestamp: draft.timestamp,
            actor: draft.actor,
            action: draft.action,
            resource_id: draft.resource_id,
            decision: draft.decision,
            reason_code: draft.reason_code,
            hash: String::new(),
            previous_hash: previous_hash.to_string(),
        };
        record.hash = record.compute_hash()?;
        Ok(record)
    }

    /// Recompute what this record's hash should be from its own fields and
    /// its stored `previous_hash`
    pub fn compute_hash(&self) -> serde_json::Result<String> {
        let canonical = serde_json::to_vec(&CanonicalRecord {
            id: &self.id,
            timestamp: &self.timestamp,
            actor: &self.actor,
            action: &self.action,
            resource_id: &self.resource_id,
            decision: &self.decision,
            reason_code: &self.reason_code,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hasher.update(self.previous_hash.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Verify a contiguous run of one tenant's records
///
/// Checks that every record's stored hash matches the recomputation from
/// its own fields, and that each record's `previous_hash` equals its
/// predecessor's hash. The first record's `previous_hash` is taken as
/// given, so any contiguous range can be verified without the records
/// before it.
///
/// Returns the id of the first record that fails, or `None` when the run
/// is intact.
pub fn verify_records(records: &[AuditRecord]) -> Option<Uuid> {
    let mut expected_prev: Option<&str> = None;
    for record in records {
        if let Some(prev) = expected_prev
            && record.previous_hash != prev
        {
            return Some(record.id);
        }
        match record.compute_hash() {
            Ok(hash) if hash == record.hash => {}
            _ => return Some(record.id),
        }
        expected_prev = Some(&record.hash);
    }
    None
}
