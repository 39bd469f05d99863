//! Principal directory trait
//!
//! Defines the seam to the external identity/auth service. Implementations
//! resolve an already-issued token into a [`Principal`] snapshot; the
//! snapshot is immutable for the duration of one evaluation.

use crate::error::DirectoryError;
use crate::model::Principal;
// async_trait required for dyn-compatibility with Arc<dyn PrincipalDirectory>
use async_trait::async_trait;
use std::sync::Arc;

/// Principal directory trait
///
/// The engine consumes the resolved principal as-is. Resolution failure is
/// an expected outcome (expired or revoked token) and callers treat it as
/// deny, never as a crash.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Resolve a token into a principal snapshot
    async fn resolve(&self, token: &str) -> Result<Principal, DirectoryError>;

    /// Get a description of the directory backend (for logging)
    fn directory_type(&self) -> &'static str;
}

/// Shared directory handle
pub type BoxedDirectory = Arc<dyn PrincipalDirectory>;
