//! Audit logger trait and the in-memory chain store

use crate::audit::record::{AuditDraft, AuditRecord, GENESIS_HASH, verify_records};
use crate::error::{AuditError, AuditResult};
// async_trait required for dyn-compatibility with Arc<dyn AuditLogger>
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of a chain verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainVerification {
    pub valid: bool,
    /// First record whose stored hash does not match the recomputed one
    pub first_broken: Option<Uuid>,
}

impl ChainVerification {
    pub const fn intact() -> Self {
        Self {
            valid: true,
            first_broken: None,
        }
    }

    pub const fn broken_at(record_id: Uuid) -> Self {
        Self {
            valid: false,
            first_broken: Some(record_id),
        }
    }
}

/// Audit logger contract
///
/// Appending computes the record's hash against the tenant's current head
/// and advances the head in one atomic step. Appends for different tenants
/// are independent and must not contend.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    /// Seal and persist a draft; returns the chained record
    async fn append(&self, draft: AuditDraft) -> AuditResult<AuditRecord>;

    /// Recompute a tenant's chain over a time range; verification is
    /// reported, never auto-repaired
    async fn verify_chain(
        &self,
        tenant_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AuditResult<ChainVerification>;

    /// Export a tenant's records over a time range, oldest first
    async fn export(
        &self,
        tenant_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AuditResult<Vec<AuditRecord>>;
}

/// Shared logger handle
pub type BoxedAuditLogger = Arc<dyn AuditLogger>;

/// One tenant's chain state: head pointer plus records partitioned by
/// month. Guarded by a single mutex so the hash computation and the head
/// advance are one atomic step.
#[derive(Default)]
struct TenantChain {
    head: Option<String>,
    /// `YYYY-MM` partition key -> records in append order
    partitions: BTreeMap<String, Vec<AuditRecord>>,
}

impl TenantChain {
    fn records_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<AuditRecord> {
        self.partitions
            .values()
            .flatten()
            .filter(|r| from.is_none_or(|f| r.timestamp >= f))
            .filter(|r| to.is_none_or(|t| r.timestamp <= t))
            .cloned()
            .collect()
    }
}

fn partition_key(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m").to_string()
}

/// In-memory audit log
///
/// Per-tenant mutexes serialize appends within a tenant; the outer map
/// lock is held only long enough to find or create a tenant's chain.
#[derive(Default)]
pub struct MemoryAuditLog {
    tenants: RwLock<HashMap<String, Arc<Mutex<TenantChain>>>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    async fn chain(&self, tenant_id: &str) -> Arc<Mutex<TenantChain>> {
        if let Some(chain) = self.tenants.read().await.get(tenant_id) {
            return chain.clone();
        }
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(tenant_id.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl AuditLogger for MemoryAuditLog {
    async fn append(&self, draft: AuditDraft) -> AuditResult<AuditRecord> {
        let chain = self.chain(&draft.actor.tenant_id).await;
        let mut chain = chain.lock().await;

        let previous_hash = chain.head.as_deref().unwrap_or(GENESIS_HASH);
        let record = AuditRecord::seal(draft, Uuid::new_v4(), previous_hash)?;

        debug!(
            record = %record.id,
            tenant = %record.actor.tenant_id,
            action = %record.action,
            decision = %record.decision,
            reason = %record.reason_code,
            "Appended audit record"
        );

        chain.head = Some(record.hash.clone());
        chain
            .partitions
            .entry(partition_key(record.timestamp))
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn verify_chain(
        &self,
        tenant_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AuditResult<ChainVerification> {
        let chain = self.chain(tenant_id).await;
        let chain = chain.lock().await;
        let records = chain.records_in_range(from, to);

        match verify_records(&records) {
            None => Ok(ChainVerification::intact()),
            Some(record_id) => {
                warn!(
                    tenant = tenant_id,
                    record = %record_id,
                    "Audit chain verification failed"
                );
                Ok(ChainVerification::broken_at(record_id))
            }
        }
    }

    async fn export(
        &self,
        tenant_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AuditResult<Vec<AuditRecord>> {
        let chain = self.chain(tenant_id).await;
        let chain = chain.lock().await;
        Ok(chain.records_in_range(from, to))
    }
}

/// Logger that refuses every append
///
/// Exercises the fail-closed contract: callers must fail the whole
/// operation when the audit write fails.
pub struct FailingAuditLog;

#[async_trait]
impl AuditLogger for FailingAuditLog {
    async fn append(&self, _draft: AuditDraft) -> AuditResult<AuditRecord> {
        Err(AuditError::WriteFailed("audit backend unavailable".into()))
    }

    async fn verify_chain(
        &self,
        _tenant_id: &str,
        _from: Option<DateTime<Utc>>,
        _to: Option<DateTime<Utc>>,
    ) -> AuditResult<ChainVerification> {
        Err(AuditError::WriteFailed("audit backend unavailable".into()))
    }

    async fn export(
        &self,
        _tenant_id: &str,
        _from: Option<DateTime<Utc>>,
        _to: Option<DateTime<Utc>>,
    ) -> AuditResult<Vec<AuditRecord>> {
        Err(AuditError::WriteFailed("audit backend unavailable".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::record::{ActorInfo, AuditAction};
    use crate::engine::{Decision, ReasonCode};

    fn draft(tenant: &str) -> AuditDraft {
        AuditDraft {
            timestamp: Utc::now(),
            actor: ActorInfo::new("alice", tenant),
            action: AuditAction::CheckAccess,
            resource_id: "doc-1".into(),
            decision: Decision::Allow,
            reason_code: ReasonCode::Owner,
        }
    }

    #[tokio::test]
    async fn test_append_links_records() {
        let log = MemoryAuditLog::new();
        let first = log.append(draft("acme")).await.unwrap();
        let second = log.append(draft("acme")).await.unwrap();

        assert_eq!(first.previous_hash, GENESIS_HASH);
        assert_eq!(second.previous_hash, first.hash);
    }

    #[tokio::test]
    async fn test_tenant_chains_are_independent() {
        let log = MemoryAuditLog::new();
        log.append(draft("acme")).await.unwrap();
        let globex = log.append(draft("globex")).await.unwrap();

        // A new tenant starts from genesis regardless of other chains.
        assert_eq!(globex.previous_hash, GENESIS_HASH);

        assert!(log.verify_chain("acme", None, None).await.unwrap().valid);
        assert!(log.verify_chain("globex", None, None).await.unwrap().valid);
    }

    #[tokio::test]
    async fn test_verify_empty_tenant() {
        let log = MemoryAuditLog::new();
        let verification = log.verify_chain("nobody", None, None).await.unwrap();
        assert!(verification.valid);
    }

    #[tokio::test]
    async fn test_export_respects_range() {
        let log = MemoryAuditLog::new();
        let record = log.append(draft("acme")).await.unwrap();

        let all = log.export("acme", None, None).await.unwrap();
        assert_eq!(all.len(), 1);

        let before = log
            .export("acme", None, Some(record.timestamp - chrono::Duration::hours(1)))
            .await
            .unwrap();
        assert!(before.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_stay_chained() {
        let log = Arc::new(MemoryAuditLog::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append(draft("acme")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let verification = log.verify_chain("acme", None, None).await.unwrap();
        assert!(verification.valid, "chain broken: {verification:?}");
        assert_eq!(log.export("acme", None, None).await.unwrap().len(), 16);
    }
}
