//! The access control façade
//!
//! Orchestrates the ACL store, the evaluation engine, the classification
//! policy, and the audit logger. Every `check_access`, `grant_access`, and
//! `revoke_access` call produces exactly one audit record; if the record
//! cannot be written the whole call fails (fail-closed), and for mutations
//! the store change is rolled back first.

use crate::audit::{ActorInfo, AuditAction, AuditDraft, BoxedAuditLogger, ChainVerification};
use crate::audit::AuditRecord;
use crate::classification::{ClassificationPolicy, RequestContext};
use crate::engine::{self, ReasonCode, Verdict};
use crate::error::{Result, ServiceError, StoreError};
use crate::model::{
    AccessControlEntry, AceEffect, Document, Permission, Principal, PrincipalType, RoleMatrix,
};
use crate::store::BoxedAclStore;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// A grant or deny to be written by [`AccessControlService::grant_access`]
#[derive(Debug, Clone, PartialEq)]
pub struct GrantRequest {
    pub document_id: String,
    pub principal_type: PrincipalType,
    pub principal_id: String,
    pub permission: Permission,
    pub effect: AceEffect,
    pub expires_at: Option<DateTime<Utc>>,
}

impl GrantRequest {
    pub fn grant(
        document_id: impl Into<String>,
        principal_type: PrincipalType,
        principal_id: impl Into<String>,
        permission: Permission,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            principal_type,
            principal_id: principal_id.into(),
            permission,
            effect: AceEffect::Grant,
            expires_at: None,
        }
    }

    pub fn deny(
        document_id: impl Into<String>,
        principal_type: PrincipalType,
        principal_id: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            principal_type,
            principal_id: principal_id.into(),
            permission: Permission::Read,
            effect: AceEffect::Deny,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Multi-tenant document access-control service
pub struct AccessControlService {
    store: BoxedAclStore,
    audit: BoxedAuditLogger,
    policy: ClassificationPolicy,
    matrix: RoleMatrix,
}

impl AccessControlService {
    pub fn new(
        store: BoxedAclStore,
        audit: BoxedAuditLogger,
        policy: ClassificationPolicy,
        matrix: RoleMatrix,
    ) -> Self {
        Self {
            store,
            audit,
            policy,
            matrix,
        }
    }

    /// Decide whether `principal` may exercise `permission` on a document
    ///
    /// Denial is a normal outcome carried in the returned [`Verdict`]. An
    /// `Err` means access could not be determined; callers must treat it
    /// as deny, never default to allow. An unknown document is denied with
    /// `implicit_deny` — callers cannot distinguish a hidden document from
    /// a missing one.
    pub async fn check_access(
        &self,
        principal: &Principal,
        document_id: &str,
        permission: Permission,
        ctx: &RequestContext,
    ) -> Result<Verdict> {
        let now = Utc::now();

        let verdict = match self.store.get_document(document_id).await {
            Ok(document) => {
                let entries = self.store.entries(document_id).await?;
                let verdict = engine::evaluate(
                    principal,
                    &document,
                    permission,
                    &entries,
                    &self.policy,
                    &self.matrix,
                    ctx,
                    now,
                );
                if self.policy.log_all_access(document.classification) {
                    info!(
                        user = %principal.user_id,
                        document = document_id,
                        classification = %document.classification,
                        decision = %verdict.decision,
                        reason = %verdict.reason,
                        "Access to classified document"
                    );
                }
                verdict
            }
            Err(StoreError::DocumentNotFound(_)) => Verdict::deny(ReasonCode::ImplicitDeny),
            Err(e) => return Err(e.into()),
        };

        // Decision first, audit second, return last. Partial audit writes
        // are not permitted: a failed append fails the whole call.
        self.audit
            .append(AuditDraft {
                timestamp: now,
                actor: actor_info(principal, ctx),
                action: AuditAction::CheckAccess,
                resource_id: document_id.to_string(),
                decision: verdict.decision,
                reason_code: verdict.reason,
            })
            .await?;

        Ok(verdict)
    }

    /// Post-filter a candidate set down to the documents `principal` may
    /// access
    ///
    /// Preserves the input order and checks duplicates individually — the
    /// input is not assumed deduplicated. Any infrastructure error aborts
    /// the whole call: the retrieval pipeline degrades to an empty result
    /// set, never an unfiltered one.
    pub async fn filter_accessible(
        &self,
        principal: &Principal,
        document_ids: &[String],
        permission: Permission,
        ctx: &RequestContext,
    ) -> Result<Vec<String>> {
        let mut accessible = Vec::new();
        for document_id in document_ids {
            let verdict = self
                .check_access(principal, document_id, permission, ctx)
                .await?;
            if verdict.is_allowed() {
                accessible.push(document_id.clone());
            }
        }
        Ok(accessible)
    }

    /// Write a grant or deny entry
    ///
    /// The actor must hold `share` on the target document; the owner
    /// bypasses that check. Delegation is capped at the actor's own level:
    /// an actor holding `share` but not `admin` cannot grant `admin`.
    /// Returns the stored entry.
    pub async fn grant_access(
        &self,
        actor: &Principal,
        request: GrantRequest,
        ctx: &RequestContext,
    ) -> Result<AccessControlEntry> {
        let now = Utc::now();
        let document = self.store.get_document(&request.document_id).await?;
        let entries = self.store.entries(&request.document_id).await?;

        let authorization = self
            .authorize_mutation(actor, &document, &entries, "grant", ctx, now)
            .await?;

        // Delegation cap: granting admin requires holding admin.
        if request.effect == AceEffect::Grant
            && request.permission == Permission::Admin
            && !document.is_owned_by(&actor.user_id)
        {
            let as_admin = engine::evaluate(
                actor,
                &document,
                Permission::Admin,
                &entries,
                &self.policy,
                &self.matrix,
                ctx,
                now,
            );
            if as_admin.is_denied() {
                self.append_mutation_record(
                    actor,
                    &document.id,
                    AuditAction::Grant,
                    Verdict::deny(as_admin.reason),
                    ctx,
                    now,
                )
                .await?;
                return Err(ServiceError::NotAuthorized {
                    actor: actor.user_id.clone(),
                    document: document.id.clone(),
                    action: "grant admin".into(),
                });
            }
        }

        let version = self.store.document_version(&request.document_id).await?;
        let entry = AccessControlEntry {
            document_id: request.document_id.clone(),
            principal_type: request.principal_type,
            principal_id: request.principal_id.clone(),
            effect: request.effect,
            permission: request.permission,
            granted_by: actor.user_id.clone(),
            granted_at: now,
            expires_at: request.expires_at,
        };

        let outcome = self
            .store
            .put_entry(
                entry.clone(),
                self.policy.max_entries(document.classification),
                Some(version),
            )
            .await?;

        // Audit before reporting success; roll the mutation back if the
        // record cannot be written.
        if let Err(e) = self
            .append_mutation_record(
                actor,
                &document.id,
                AuditAction::Grant,
                Verdict::allow(authorization.reason),
                ctx,
                now,
            )
            .await
        {
            self.rollback_put(&entry, outcome.replaced).await;
            return Err(e);
        }

        info!(
            actor = %actor.user_id,
            document = %document.id,
            principal_type = %entry.principal_type,
            principal_id = %entry.principal_id,
            permission = %entry.permission,
            "Granted access"
        );
        Ok(entry)
    }

    /// Remove an entry
    ///
    /// Same authorization as [`grant_access`]. The owner's implicit admin
    /// is not an entry and can never be revoked here.
    ///
    /// [`grant_access`]: AccessControlService::grant_access
    pub async fn revoke_access(
        &self,
        actor: &Principal,
        document_id: &str,
        principal_type: PrincipalType,
        principal_id: &str,
        ctx: &RequestContext,
    ) -> Result<()> {
        let now = Utc::now();
        let document = self.store.get_document(document_id).await?;
        let entries = self.store.entries(document_id).await?;

        let authorization = self
            .authorize_mutation(actor, &document, &entries, "revoke", ctx, now)
            .await?;

        let version = self.store.document_version(document_id).await?;
        let removed = self
            .store
            .delete_entry(document_id, principal_type, principal_id, Some(version))
            .await?;

        if let Err(e) = self
            .append_mutation_record(
                actor,
                document_id,
                AuditAction::Revoke,
                Verdict::allow(authorization.reason),
                ctx,
                now,
            )
            .await
        {
            // Restore the removed entry; the revoke did not happen.
            if let Err(restore) = self.store.put_entry(removed, None, None).await {
                error!(error = %restore, document = document_id, "Rollback after audit failure failed");
            }
            return Err(e);
        }

        info!(
            actor = %actor.user_id,
            document = document_id,
            principal_type = %principal_type,
            principal_id = principal_id,
            "Revoked access"
        );
        Ok(())
    }

    /// Verify a tenant's audit chain over a time range
    pub async fn verify_chain(
        &self,
        tenant_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<ChainVerification> {
        Ok(self.audit.verify_chain(tenant_id, from, to).await?)
    }

    /// Export a tenant's audit records for regulator-facing reports
    pub async fn export_audit(
        &self,
        tenant_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<AuditRecord>> {
        Ok(self.audit.export(tenant_id, from, to).await?)
    }

    /// Authorize an ACL mutation: classification pre-check, then owner
    /// bypass, then a recursive `share` evaluation. A refusal is audited
    /// before the error is returned.
    async fn authorize_mutation(
        &self,
        actor: &Principal,
        document: &Document,
        entries: &[AccessControlEntry],
        action: &str,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> Result<Verdict> {
        let audit_action = match action {
            "revoke" => AuditAction::Revoke,
            _ => AuditAction::Grant,
        };

        if let Some(block) = self.policy.pre_check(document.classification, ctx) {
            self.append_mutation_record(
                actor,
                &document.id,
                audit_action,
                Verdict::deny(ReasonCode::ClassificationBlocked),
                ctx,
                now,
            )
            .await?;
            return Err(ServiceError::NotAuthorized {
                actor: actor.user_id.clone(),
                document: document.id.clone(),
                action: format!("{action} ({})", block.as_str()),
            });
        }

        if document.is_owned_by(&actor.user_id) {
            return Ok(Verdict::allow(ReasonCode::Owner));
        }

        let verdict = engine::evaluate(
            actor,
            document,
            Permission::Share,
            entries,
            &self.policy,
            &self.matrix,
            ctx,
            now,
        );
        if verdict.is_denied() {
            self.append_mutation_record(actor, &document.id, audit_action, verdict, ctx, now)
                .await?;
            return Err(ServiceError::NotAuthorized {
                actor: actor.user_id.clone(),
                document: document.id.clone(),
                action: action.to_string(),
            });
        }
        Ok(verdict)
    }

    async fn append_mutation_record(
        &self,
        actor: &Principal,
        document_id: &str,
        action: AuditAction,
        verdict: Verdict,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.audit
            .append(AuditDraft {
                timestamp: now,
                actor: actor_info(actor, ctx),
                action,
                resource_id: document_id.to_string(),
                decision: verdict.decision,
                reason_code: verdict.reason,
            })
            .await?;
        Ok(())
    }

    async fn rollback_put(
        &self,
        entry: &AccessControlEntry,
        replaced: Option<AccessControlEntry>,
    ) {
        let result = match replaced {
            Some(previous) => self.store.put_entry(previous, None, None).await.map(|_| ()),
            None => self
                .store
                .delete_entry(
                    &entry.document_id,
                    entry.principal_type,
                    &entry.principal_id,
                    None,
                )
                .await
                .map(|_| ()),
        };
        if let Err(e) = result {
            error!(
                error = %e,
                document = %entry.document_id,
                "Rollback after audit failure failed"
            );
        }
    }
}

fn actor_info(principal: &Principal, ctx: &RequestContext) -> ActorInfo {
    ActorInfo {
        user_id: principal.user_id.clone(),
        tenant_id: principal.tenant_id.clone(),
        roles: principal.roles.clone(),
        ip: ctx.source_ip,
    }
}
