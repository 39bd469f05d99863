//! Error types for docgate
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API.
//!
//! Access denial is NOT an error: `check_access` returns a [`Verdict`] value
//! for both allow and deny outcomes. Errors here mean "cannot determine
//! access" and callers must treat them as fail-closed.
//!
//! [`Verdict`]: crate::engine::Verdict

use thiserror::Error;

/// Top-level service error
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("ACL store error: {0}")]
    Store(#[from] StoreError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Principal directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The acting principal does not hold the permission required to
    /// perform a grant or revoke on the target document.
    #[error("Actor '{actor}' is not authorized to {action} on document '{document}'")]
    NotAuthorized {
        actor: String,
        document: String,
        action: String,
    },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Unknown role '{role}' in {field}")]
    UnknownRole { role: String, field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// ACL store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The entry names a permission or principal the closed model does not
    /// accept (e.g. an empty principal id, or a role principal whose id is
    /// not a known role).
    #[error("Invalid permission or principal: {message}")]
    InvalidPermission { message: String },

    /// The document's classification caps the number of ACL entries and the
    /// cap would be exceeded.
    #[error(
        "Document '{document}' allows at most {limit} ACL entries for its classification"
    )]
    ClassificationLimitExceeded { document: String, limit: usize },

    /// Optimistic concurrency conflict: the document changed between the
    /// caller's read and its mutation. Callers should retry.
    #[error("Document '{document}' was concurrently modified (expected version {expected}, found {found})")]
    ConflictingVersion {
        document: String,
        expected: u64,
        found: u64,
    },

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("No ACL entry for ({principal_type}, {principal_id}) on document '{document}'")]
    EntryNotFound {
        document: String,
        principal_type: String,
        principal_id: String,
    },

    /// The backing store is unreachable. Callers must fail closed.
    #[error("ACL store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidPermission {
            message: message.into(),
        }
    }
}

/// Audit logging errors
///
/// Any failure to append is fatal for the operation that produced the
/// record: the caller must fail the whole call rather than proceed with an
/// unlogged decision.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit write failed: {0}")]
    WriteFailed(String),

    #[error("Audit chain for tenant '{tenant}' is broken at record {record_id}")]
    ChainBroken { tenant: String, record_id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Principal directory errors
///
/// Resolution failures are treated as deny by callers, never as a crash.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Unknown or expired token")]
    UnknownToken,

    #[error("Principal resolution failed: {0}")]
    ResolutionFailed(String),
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for audit operations
pub type AuditResult<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_messages() {
        let err = StoreError::ClassificationLimitExceeded {
            document: "doc-1".into(),
            limit: 10,
        };
        assert!(err.to_string().contains("at most 10"));

        let err = StoreError::ConflictingVersion {
            document: "doc-1".into(),
            expected: 3,
            found: 4,
        };
        assert!(err.to_string().contains("concurrently modified"));
    }

    #[test]
    fn test_service_error_from_store() {
        let err: ServiceError = StoreError::DocumentNotFound("doc-9".into()).into();
        assert!(matches!(err, ServiceError::Store(_)));
    }
}
