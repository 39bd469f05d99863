//! Document Access Control Engine
//!
//! A multi-tenant document ACL evaluation engine with an immutable,
//! tamper-evident audit trail. It decides, for every retrieval or
//! management request, whether an identity may read, write, share, or
//! administer a document — and records every decision in a per-tenant
//! hash chain that can later prove the log was not altered.
//!
//! ## Features
//!
//! - **Deterministic evaluation** through a fixed precedence of checks:
//!   explicit deny, ownership, user/group/role grants, tenant and public
//!   visibility defaults
//! - **Classification overrides** applied before ACL resolution —
//!   restricted documents never leak through a misconfigured grant
//! - **Time-bounded grants** with a background expiry sweeper
//! - **Hash-chained audit log** partitioned per tenant, with range
//!   verification and export for compliance tooling
//! - **Fail-closed** everywhere: no decision without an audit record, no
//!   infrastructure failure that defaults to allow
//!
//! ## Evaluation Order
//!
//! ```text
//! classification pre-check → explicit deny → owner → user grant
//!   → group grant → role grant → tenant default → public → implicit deny
//! ```
//!
//! Permission levels are totally ordered (`admin ⊇ share ⊇ write ⊇ read`);
//! a grant satisfies every level at or below its own.
//!
//! ## Example Configuration
//!
//! ```toml
//! [classification.confidential]
//! require_mfa = true
//! max_acl_entries = 25
//!
//! [roles.ceilings]
//! auditor = "read"                # audit roles can never be escalated
//!
//! [sweep]
//! interval_secs = 300
//! ```
//!
//! ## Embedding
//!
//! Construct one [`AccessControlService`] per deployment and pass it to
//! consumers explicitly; the crate keeps no global state.

pub mod audit;
pub mod classification;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

// Re-export main types
pub use classification::{ClassificationPolicy, RequestContext};
pub use config::{AppConfig, load_config};
pub use engine::{Decision, ReasonCode, Verdict};
pub use error::{Result, ServiceError};
pub use model::{Permission, Principal};
pub use service::{AccessControlService, ExpirySweeper, GrantRequest};
