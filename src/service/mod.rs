//! Access control service
//!
//! Composition root exposed to external collaborators: the retrieval
//! pipeline post-filters candidate documents through it, the management
//! API mutates grants through it, and compliance tooling reads the audit
//! chain through it. One service is constructed per deployment and passed
//! explicitly to consumers — there are no process-wide singletons.

pub mod access;
pub mod sweeper;

pub use access::{AccessControlService, GrantRequest};
pub use sweeper::ExpirySweeper;
