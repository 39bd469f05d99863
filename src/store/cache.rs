//! Read-through entry cache
//!
//! Decorates any [`AclStore`] with a per-document entry cache so the
//! evaluation hot path does not hit the backing store on every check.
//! Cache slots hold an `Arc` snapshot and are atomically replaced on
//! invalidation; readers never hold the map lock across a store call.

use crate::error::StoreResult;
use crate::model::{AccessControlEntry, Document, PrincipalType};
use crate::store::traits::{AclStore, BoxedAclStore, PutOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

/// Caching decorator over an inner store
pub struct CachedAclStore {
    inner: BoxedAclStore,
    entries: RwLock<HashMap<String, Arc<Vec<AccessControlEntry>>>>,
}

impl CachedAclStore {
    pub fn new(inner: BoxedAclStore) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn invalidate(&self, document_id: &str) {
        self.entries.write().await.remove(document_id);
    }

    async fn invalidate_all(&self) {
        self.entries.write().await.clear();
    }

    /// Number of cached documents (test observability)
    pub async fn cached_documents(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl AclStore for CachedAclStore {
    async fn get_document(&self, document_id: &str) -> StoreResult<Document> {
        self.inner.get_document(document_id).await
    }

    async fn put_document(&self, document: Document) -> StoreResult<()> {
        let id = document.id.clone();
        self.inner.put_document(document).await?;
        self.invalidate(&id).await;
        Ok(())
    }

    async fn remove_document(&self, document_id: &str) -> StoreResult<()> {
        self.inner.remove_document(document_id).await?;
        self.invalidate(document_id).await;
        Ok(())
    }

    async fn entries(&self, document_id: &str) -> StoreResult<Vec<AccessControlEntry>> {
        if let Some(cached) = self.entries.read().await.get(document_id) {
            trace!(document = document_id, "Entry cache hit");
            return Ok(cached.as_ref().clone());
        }

        let loaded = self.inner.entries(document_id).await?;
        self.entries
            .write()
            .await
            .insert(document_id.to_string(), Arc::new(loaded.clone()));
        trace!(document = document_id, "Entry cache fill");
        Ok(loaded)
    }

    async fn document_version(&self, document_id: &str) -> StoreResult<u64> {
        self.inner.document_version(document_id).await
    }

    async fn put_entry(
        &self,
        entry: AccessControlEntry,
        max_entries: Option<usize>,
        expected_version: Option<u64>,
    ) -> StoreResult<PutOutcome> {
        let document_id = entry.document_id.clone();
        let outcome = self
            .inner
            .put_entry(entry, max_entries, expected_version)
            .await?;
        self.invalidate(&document_id).await;
        Ok(outcome)
    }

    async fn delete_entry(
        &self,
        document_id: &str,
        principal_type: PrincipalType,
        principal_id: &str,
        expected_version: Option<u64>,
    ) -> StoreResult<AccessControlEntry> {
        let removed = self
            .inner
            .delete_entry(document_id, principal_type, principal_id, expected_version)
            .await?;
        self.invalidate(document_id).await;
        Ok(removed)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let removed = self.inner.sweep_expired(now).await?;
        if removed > 0 {
            // The sweep does not report which documents it touched.
            self.invalidate_all().await;
        }
        Ok(removed)
    }
}
