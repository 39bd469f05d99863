//! Configuration types for docgate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::classification::{ClassificationPolicy, ClassificationRule};
use crate::error::ConfigError;
use crate::model::{Classification, Permission, Role, RoleMatrix};
use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-level classification rule overrides, keyed by level name
    pub classification: HashMap<String, ClassificationRule>,

    /// Role permission matrix
    pub roles: RolesConfig,

    /// Expiry sweeper settings
    pub sweep: SweepConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build the classification policy, validating level names
    pub fn classification_policy(&self) -> Result<ClassificationPolicy, ConfigError> {
        let mut overrides = HashMap::new();
        for (name, rule) in &self.classification {
            let level = Classification::try_parse(name).ok_or_else(|| ConfigError::Invalid {
                message: format!("Unknown classification level: {}", name),
            })?;
            if rule.max_acl_entries == Some(0) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "classification.{}.max_acl_entries must be greater than 0",
                        name
                    ),
                });
            }
            overrides.insert(level, *rule);
        }
        Ok(ClassificationPolicy::new(overrides))
    }

    /// Build the role matrix, validating role and permission names
    pub fn role_matrix(&self) -> Result<RoleMatrix, ConfigError> {
        let mut ceilings = RoleMatrix::default().ceilings;
        for (name, permission) in &self.roles.ceilings {
            let role = Role::try_parse(name).ok_or_else(|| ConfigError::UnknownRole {
                role: name.clone(),
                field: "roles.ceilings".into(),
            })?;
            let permission =
                Permission::try_parse(permission).ok_or_else(|| ConfigError::Invalid {
                    message: format!(
                        "Unknown permission '{}' for roles.ceilings.{}",
                        permission, name
                    ),
                })?;
            ceilings.insert(role, permission);
        }
        Ok(RoleMatrix::new(self.roles.version, ceilings))
    }
}

/// Role matrix configuration
///
/// Ceilings are keyed by role name and valued by permission name; roles
/// not listed keep the built-in defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Bump whenever ceilings change
    pub version: u32,

    /// Role name -> maximum grantable permission
    pub ceilings: HashMap<String, String>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            version: 1,
            ceilings: HashMap::new(),
        }
    }
}

/// Expiry sweeper configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Run the background sweep task
    pub enabled: bool,

    /// Seconds between sweeps
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.sweep.enabled);
        assert_eq!(config.sweep.interval_secs, 300);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.roles.version, 1);
    }

    #[test]
    fn test_default_policy_and_matrix() {
        let config = AppConfig::default();
        let policy = config.classification_policy().unwrap();
        assert!(policy.rule(Classification::Restricted).require_mfa);

        let matrix = config.role_matrix().unwrap();
        assert_eq!(matrix.ceiling(Role::Auditor), Permission::Read);
    }

    #[test]
    fn test_unknown_classification_level() {
        let mut config = AppConfig::default();
        config
            .classification
            .insert("top_secret".into(), ClassificationRule::default());
        assert!(config.classification_policy().is_err());
    }

    #[test]
    fn test_unknown_role_in_ceilings() {
        let mut config = AppConfig::default();
        config
            .roles
            .ceilings
            .insert("superuser".into(), "admin".into());
        assert!(matches!(
            config.role_matrix().unwrap_err(),
            ConfigError::UnknownRole { .. }
        ));
    }

    #[test]
    fn test_ceiling_override() {
        let mut config = AppConfig::default();
        config
            .roles
            .ceilings
            .insert("contributor".into(), "write".into());
        let matrix = config.role_matrix().unwrap();
        assert_eq!(matrix.ceiling(Role::Contributor), Permission::Write);
        // Untouched defaults survive.
        assert_eq!(matrix.ceiling(Role::Auditor), Permission::Read);
    }
}
