//! The evaluation function
//!
//! See the module docs on [`crate::engine`] for the precedence contract.
//! The function is pure: it takes everything it needs as arguments,
//! including the clock, so expiry behavior is deterministic under test.

use crate::classification::{ClassificationPolicy, RequestContext};
use crate::engine::types::{ReasonCode, Verdict};
use crate::model::{
    AccessControlEntry, AceEffect, Document, Permission, Principal, PrincipalType, Role,
    RoleMatrix,
};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// Evaluate whether a principal holds a permission on a document
///
/// Entries that have expired as of `now` are treated as absent throughout.
/// The first matching step wins; groups and roles are iterated in their
/// sets' stable order so the reported reason is deterministic even when
/// several entries would suffice.
pub fn evaluate(
    principal: &Principal,
    document: &Document,
    requested: Permission,
    entries: &[AccessControlEntry],
    policy: &ClassificationPolicy,
    matrix: &RoleMatrix,
    ctx: &RequestContext,
    now: DateTime<Utc>,
) -> Verdict {
    debug!(
        user = %principal.user_id,
        document = %document.id,
        permission = %requested,
        classification = %document.classification,
        "Evaluating access"
    );

    // 0. Classification pre-check, before any entry is consulted. A
    // misconfigured grant on a restricted document can never leak access.
    if let Some(block) = policy.pre_check(document.classification, ctx) {
        trace!(block = block.as_str(), "Blocked by classification pre-check");
        return Verdict::deny(ReasonCode::ClassificationBlocked);
    }

    let live: Vec<&AccessControlEntry> =
        entries.iter().filter(|e| !e.is_expired(now)).collect();

    // 1. Explicit deny always wins, even over ownership.
    if live
        .iter()
        .any(|e| e.effect == AceEffect::Deny && e.addresses(principal))
    {
        trace!("Matched explicit deny entry");
        return Verdict::deny(ReasonCode::ExplicitDeny);
    }

    // 2. Ownership satisfies every permission level.
    if document.is_owned_by(&principal.user_id) {
        trace!("Principal owns the document");
        return Verdict::allow(ReasonCode::Owner);
    }

    // 3. Direct user grant.
    if live.iter().any(|e| {
        e.effect == AceEffect::Grant
            && e.principal_type == PrincipalType::User
            && e.principal_id == principal.user_id
            && e.permission.satisfies(requested)
    }) {
        trace!("Matched direct user grant");
        return Verdict::allow(ReasonCode::ExplicitUser);
    }

    // 4. Group grants, groups in stable (lexicographic) order.
    for group_id in &principal.group_ids {
        if live.iter().any(|e| {
            e.effect == AceEffect::Grant
                && e.principal_type == PrincipalType::Group
                && e.principal_id == *group_id
                && e.permission.satisfies(requested)
        }) {
            trace!(group = %group_id, "Matched group grant");
            return Verdict::allow(ReasonCode::GroupMembership);
        }
    }

    // 5. Role grants, capped by the matrix ceiling for the role.
    for role in &principal.roles {
        let ceiling = matrix.ceiling(*role);
        if live.iter().any(|e| {
            e.effect == AceEffect::Grant
                && e.principal_type == PrincipalType::Role
                && Role::try_parse(&e.principal_id) == Some(*role)
                && e.permission.min(ceiling).satisfies(requested)
        }) {
            trace!(role = %role, matrix_version = matrix.version, "Matched role grant");
            return Verdict::allow(ReasonCode::RoleBased);
        }
    }

    // 6. Tenant default: tenant visibility confers read to the document's
    // own tenant; an explicit tenant entry can confer more.
    if principal.tenant_id == document.tenant_id {
        let by_visibility = document.visibility == crate::model::Visibility::Tenant
            && requested == Permission::Read;
        let by_entry = live.iter().any(|e| {
            e.effect == AceEffect::Grant
                && e.principal_type == PrincipalType::Tenant
                && e.principal_id == document.tenant_id
                && e.permission.satisfies(requested)
        });
        if by_visibility || by_entry {
            trace!("Matched tenant default");
            return Verdict::allow(ReasonCode::TenantDefault);
        }
    }

    // 7. Public visibility confers read to anyone; an explicit public
    // entry can confer more.
    {
        let by_visibility = document.visibility == crate::model::Visibility::Public
            && requested == Permission::Read;
        let by_entry = live.iter().any(|e| {
            e.effect == AceEffect::Grant
                && e.principal_type == PrincipalType::Public
                && e.permission.satisfies(requested)
        });
        if by_visibility || by_entry {
            trace!("Matched public visibility");
            return Verdict::allow(ReasonCode::VisibilityPublic);
        }
    }

    // 8. Nothing matched.
    trace!("No matching grant; implicit deny");
    Verdict::deny(ReasonCode::ImplicitDeny)
}
