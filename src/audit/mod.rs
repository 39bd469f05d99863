//! Audit trail
//!
//! Append-only, hash-linked record of every evaluation and every ACL
//! mutation. Each record's hash covers its canonical bytes plus the
//! previous record's hash, forming a chain per tenant: any retroactive
//! edit is detectable by recomputing the chain.
//!
//! Tampering is detected, not prevented — a sufficiently privileged
//! attacker with storage access could rewrite a whole chain. Periodic
//! export to write-once storage is the mitigation, served by
//! [`AuditLogger::export`].

pub mod logger;
pub mod record;

pub use logger::{
    AuditLogger, BoxedAuditLogger, ChainVerification, FailingAuditLog, MemoryAuditLog,
};
pub use record::{ActorInfo, AuditAction, AuditDraft, AuditRecord, GENESIS_HASH, verify_records};
