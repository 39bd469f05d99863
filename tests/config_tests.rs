//! Configuration loading tests
//!
//! End-to-end: a TOML file on disk becomes a validated policy and role
//! matrix ready to hand to the service.

use docgate::config::{LogFormat, load_config, load_config_from_str};
use docgate::model::{Classification, Permission, Role};
use std::io::Write;

#[test]
fn full_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[classification.confidential]
require_mfa = true
require_justification = true
max_acl_entries = 25

[classification.internal]
log_all_access = true

[roles]
version = 4

[roles.ceilings]
viewer = "read"
auditor = "read"
maintainer = "share"

[sweep]
enabled = true
interval_secs = 120

[logging]
level = "debug"
format = "json"
"#
    )
    .unwrap();

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.sweep.interval_secs, 120);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);

    let policy = config.classification_policy().unwrap();
    let confidential = policy.rule(Classification::Confidential);
    assert!(confidential.require_mfa);
    assert!(confidential.require_justification);
    assert_eq!(confidential.max_acl_entries, Some(25));
    assert!(policy.rule(Classification::Internal).log_all_access);
    // Built-in restricted defaults survive partial overrides.
    assert!(policy.rule(Classification::Restricted).require_justification);

    let matrix = config.role_matrix().unwrap();
    assert_eq!(matrix.version, 4);
    assert_eq!(matrix.ceiling(Role::Maintainer), Permission::Share);
    assert_eq!(matrix.ceiling(Role::Auditor), Permission::Read);
    // Unlisted roles keep the default ceiling.
    assert_eq!(matrix.ceiling(Role::TenantAdmin), Permission::Admin);
}

#[test]
fn empty_config_uses_defaults() {
    let config = load_config_from_str("").unwrap();
    assert!(config.sweep.enabled);
    assert_eq!(config.sweep.interval_secs, 300);
    assert_eq!(config.logging.level, "info");

    let policy = config.classification_policy().unwrap();
    assert_eq!(policy.rule(Classification::Restricted).max_acl_entries, Some(10));
    assert_eq!(policy.rule(Classification::Confidential).max_acl_entries, Some(50));
    assert_eq!(policy.rule(Classification::Public).max_acl_entries, None);
}

#[test]
fn bad_values_are_rejected_at_load_time() {
    assert!(load_config_from_str("[classification.ultra]\nrequire_mfa = true").is_err());
    assert!(load_config_from_str("[roles.ceilings]\nwizard = \"admin\"").is_err());
    assert!(load_config_from_str("[roles.ceilings]\nviewer = \"root\"").is_err());
    assert!(load_config_from_str("[sweep]\nenabled = true\ninterval_secs = 0").is_err());
    assert!(load_config_from_str("[classification.restricted]\nmax_acl_entries = 0").is_err());
}
