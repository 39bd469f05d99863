//! Domain model
//!
//! Core types shared by the ACL store, the evaluation engine, the audit
//! logger, and the service façade: documents, access-control entries,
//! resolved principals, and the closed permission/role vocabulary.
//!
//! All enums are closed: permissions, principal types, visibility levels,
//! classifications, and roles are explicit enumerations with canonical
//! string forms, never free-form strings checked against mutable tables.

pub mod ace;
pub mod document;
pub mod permission;
pub mod principal;

pub use ace::{AccessControlEntry, AceEffect};
pub use document::{Classification, Document, Visibility};
pub use permission::{Permission, PrincipalType};
pub use principal::{Principal, Role, RoleMatrix};
