//! Classification policy
//!
//! Maps data-classification levels to override rules that apply *before*
//! normal ACL resolution. A restricted document with missing request
//! evidence is blocked without a single entry being consulted, so a
//! misconfigured grant can never leak access.

pub mod policy;

pub use policy::{ClassificationPolicy, ClassificationRule, PreCheckBlock, RequestContext};
