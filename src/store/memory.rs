//! In-memory ACL store
//!
//! Per-document records behind a single `RwLock`: reads share the lock,
//! mutations serialize on the write half, and every mutation bumps the
//! document's version counter so optimistic callers can detect races.

use crate::error::{StoreError, StoreResult};
use crate::model::{AccessControlEntry, Document, PrincipalType, Role};
use crate::store::traits::{AclStore, PutOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

struct DocRecord {
    document: Document,
    entries: Vec<AccessControlEntry>,
    version: u64,
}

/// In-memory store, suitable for embedding and tests
#[derive(Default)]
pub struct MemoryAclStore {
    documents: RwLock<HashMap<String, DocRecord>>,
}

impl MemoryAclStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_entry(entry: &AccessControlEntry) -> StoreResult<()> {
        if entry.principal_id.is_empty()
            && !matches!(entry.principal_type, PrincipalType::Public)
        {
            return Err(StoreError::invalid(format!(
                "empty principal id for {} entry",
                entry.principal_type
            )));
        }
        if entry.principal_type == PrincipalType::Role
            && Role::try_parse(&entry.principal_id).is_none()
        {
            return Err(StoreError::invalid(format!(
                "unknown role '{}'",
                entry.principal_id
            )));
        }
        Ok(())
    }

    fn check_version(
        record: &DocRecord,
        document_id: &str,
        expected: Option<u64>,
    ) -> StoreResult<()> {
        if let Some(expected) = expected
            && record.version != expected
        {
            return Err(StoreError::ConflictingVersion {
                document: document_id.to_string(),
                expected,
                found: record.version,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AclStore for MemoryAclStore {
    async fn get_document(&self, document_id: &str) -> StoreResult<Document> {
        let documents = self.documents.read().await;
        documents
            .get(document_id)
            .map(|r| r.document.clone())
            .ok_or_else(|| StoreError::DocumentNotFound(document_id.to_string()))
    }

    async fn put_document(&self, document: Document) -> StoreResult<()> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(&document.id) {
            Some(record) => {
                record.document = document;
                record.version += 1;
            }
            None => {
                documents.insert(
                    document.id.clone(),
                    DocRecord {
                        document,
                        entries: Vec::new(),
                        version: 0,
                    },
                );
            }
        }
        Ok(())
    }

    async fn remove_document(&self, document_id: &str) -> StoreResult<()> {
        let mut documents = self.documents.write().await;
        match documents.remove(document_id) {
            Some(record) => {
                debug!(
                    document = document_id,
                    cascaded = record.entries.len(),
                    "Removed document and cascaded entries"
                );
                Ok(())
            }
            None => Err(StoreError::DocumentNotFound(document_id.to_string())),
        }
    }

    async fn entries(&self, document_id: &str) -> StoreResult<Vec<AccessControlEntry>> {
        let documents = self.documents.read().await;
        documents
            .get(document_id)
            .map(|r| r.entries.clone())
            .ok_or_else(|| StoreError::DocumentNotFound(document_id.to_string()))
    }

    async fn document_version(&self, document_id: &str) -> StoreResult<u64> {
        let documents = self.documents.read().await;
        documents
            .get(document_id)
            .map(|r| r.version)
            .ok_or_else(|| StoreError::DocumentNotFound(document_id.to_string()))
    }

    async fn put_entry(
        &self,
        entry: AccessControlEntry,
        max_entries: Option<usize>,
        expected_version: Option<u64>,
    ) -> StoreResult<PutOutcome> {
        Self::validate_entry(&entry)?;

        let mut documents = self.documents.write().await;
        let record = documents
            .get_mut(&entry.document_id)
            .ok_or_else(|| StoreError::DocumentNotFound(entry.document_id.clone()))?;
        Self::check_version(record, &entry.document_id, expected_version)?;

        let existing = record
            .entries
            .iter()
            .position(|e| e.same_principal(entry.principal_type, &entry.principal_id));

        // Replacement never exceeds the cap; only a genuinely new entry can.
        if existing.is_none()
            && let Some(limit) = max_entries
            && record.entries.len() >= limit
        {
            return Err(StoreError::ClassificationLimitExceeded {
                document: entry.document_id.clone(),
                limit,
            });
        }

        let replaced = match existing {
            Some(index) => Some(std::mem::replace(&mut record.entries[index], entry)),
            None => {
                record.entries.push(entry);
                None
            }
        };
        record.version += 1;

        Ok(PutOutcome {
            version: record.version,
            replaced,
        })
    }

    async fn delete_entry(
        &self,
        document_id: &str,
        principal_type: PrincipalType,
        principal_id: &str,
        expected_version: Option<u64>,
    ) -> StoreResult<AccessControlEntry> {
        let mut documents = self.documents.write().await;
        let record = documents
            .get_mut(document_id)
            .ok_or_else(|| StoreError::DocumentNotFound(document_id.to_string()))?;
        Self::check_version(record, document_id, expected_version)?;

        let index = record
            .entries
            .iter()
            .position(|e| e.same_principal(principal_type, principal_id))
            .ok_or_else(|| StoreError::EntryNotFound {
                document: document_id.to_string(),
                principal_type: principal_type.to_string(),
                principal_id: principal_id.to_string(),
            })?;

        let removed = record.entries.remove(index);
        record.version += 1;
        Ok(removed)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let mut documents = self.documents.write().await;
        let mut removed = 0;
        for record in documents.values_mut() {
            let before = record.entries.len();
            record.entries.retain(|e| !e.is_expired(now));
            let swept = before - record.entries.len();
            if swept > 0 {
                record.version += 1;
                removed += swept;
            }
        }
        if removed > 0 {
            info!(removed, "Swept expired ACL entries");
        }
        Ok(removed)
    }
}
