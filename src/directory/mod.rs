//! Principal directory
//!
//! Read-only view of identities: who a token belongs to, which tenant they
//! are in, and which groups and roles they hold. Resolution is supplied by
//! an external identity service; this engine trusts it completely and does
//! no further token validation.

pub mod provider;
pub mod static_dir;

pub use provider::{BoxedDirectory, PrincipalDirectory};
pub use static_dir::StaticDirectory;
