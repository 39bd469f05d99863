//! ACL store
//!
//! Durable mapping from document to its ordered set of access-control
//! entries, plus the document metadata the evaluator needs. Mutations are
//! versioned per document for optimistic concurrency: two simultaneous
//! grants for the same document cannot silently lose an update.
//!
//! [`MemoryAclStore`] is the reference in-process backend;
//! [`CachedAclStore`] is a read-through decorator so evaluation reads never
//! block on each other.

pub mod cache;
pub mod memory;
pub mod traits;

pub use cache::CachedAclStore;
pub use memory::MemoryAclStore;
pub use traits::{AclStore, BoxedAclStore, PutOutcome};
