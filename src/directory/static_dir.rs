//! Static in-memory principal directory
//!
//! Token-to-principal map for embedding and tests. Production deployments
//! implement [`PrincipalDirectory`] against their identity service instead.

use crate::directory::provider::PrincipalDirectory;
use crate::error::DirectoryError;
use crate::model::Principal;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// In-memory directory with a fixed token table
#[derive(Debug, Default)]
pub struct StaticDirectory {
    principals: HashMap<String, Principal>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal under a token
    pub fn insert(&mut self, token: impl Into<String>, principal: Principal) {
        self.principals.insert(token.into(), principal);
    }

    /// Builder-style registration
    pub fn with(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.insert(token, principal);
        self
    }
}

#[async_trait]
impl PrincipalDirectory for StaticDirectory {
    async fn resolve(&self, token: &str) -> Result<Principal, DirectoryError> {
        match self.principals.get(token) {
            Some(principal) => {
                debug!(user = %principal.user_id, tenant = %principal.tenant_id, "Resolved principal");
                Ok(principal.clone())
            }
            None => Err(DirectoryError::UnknownToken),
        }
    }

    fn directory_type(&self) -> &'static str {
        "static"
    }
}
