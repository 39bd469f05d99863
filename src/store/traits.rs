//! ACL store trait

use crate::error::StoreResult;
use crate::model::{AccessControlEntry, Document, PrincipalType};
// async_trait required for dyn-compatibility with Arc<dyn AclStore>
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Result of a successful entry write
#[derive(Debug, Clone, PartialEq)]
pub struct PutOutcome {
    /// Document version after the write
    pub version: u64,
    /// The entry this write replaced, if the principal already had one
    /// (uniqueness invariant: one entry per principal per document)
    pub replaced: Option<AccessControlEntry>,
}

/// ACL store contract
///
/// Reads must be safe under arbitrary concurrency and must not block other
/// reads. Mutations take an optional `expected_version`; when supplied and
/// stale, the store fails with `ConflictingVersion` and the caller retries.
/// Every mutation, including the expiry sweep, advances the document's
/// version.
#[async_trait]
pub trait AclStore: Send + Sync {
    /// Fetch document metadata
    async fn get_document(&self, document_id: &str) -> StoreResult<Document>;

    /// Create or replace document metadata
    async fn put_document(&self, document: Document) -> StoreResult<()>;

    /// Remove a document, cascading its entries
    ///
    /// Deletion is requested by an external collaborator; this subsystem
    /// never removes documents on its own.
    async fn remove_document(&self, document_id: &str) -> StoreResult<()>;

    /// All entries for a document, expired ones included
    ///
    /// Expiry filtering belongs to the evaluator (and the sweeper), not to
    /// reads: a renewal must be able to see the expired entry it replaces.
    async fn entries(&self, document_id: &str) -> StoreResult<Vec<AccessControlEntry>>;

    /// Current mutation version of a document
    async fn document_version(&self, document_id: &str) -> StoreResult<u64>;

    /// Insert or replace an entry
    ///
    /// Fails with `InvalidPermission` when the entry's principal is not
    /// expressible in the closed model, and with
    /// `ClassificationLimitExceeded` when `max_entries` is given and a new
    /// (non-replacing) entry would exceed it.
    async fn put_entry(
        &self,
        entry: AccessControlEntry,
        max_entries: Option<usize>,
        expected_version: Option<u64>,
    ) -> StoreResult<PutOutcome>;

    /// Remove an entry, returning it
    async fn delete_entry(
        &self,
        document_id: &str,
        principal_type: PrincipalType,
        principal_id: &str,
        expected_version: Option<u64>,
    ) -> StoreResult<AccessControlEntry>;

    /// Remove every entry expired as of `now`; returns how many were
    /// removed
    async fn sweep_expired(&self, now: DateTime<Utc>) -> StoreResult<usize>;
}

/// Shared store handle
pub type BoxedAclStore = Arc<dyn AclStore>;
