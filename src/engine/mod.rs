//! Evaluation engine
//!
//! Pure decision function combining a resolved principal, a document, its
//! ACL entries, the classification policy, and the role matrix into an
//! allow/deny verdict with a reason code.
//!
//! ## Evaluation Order
//!
//! Evaluation proceeds through a fixed, total ordering of checks,
//! short-circuiting on the first match. The ordering is a correctness
//! contract, not an implementation detail:
//!
//! 0. **Classification pre-check** - restricted/confidential evidence
//!    requirements, applied before any entry is consulted
//! 1. **Explicit deny** - a deny entry naming the principal wins over
//!    everything, including ownership
//! 2. **Ownership** - the owner satisfies every permission level
//! 3. **Direct user grant** - an unexpired user entry of sufficient level
//! 4. **Group grant** - group entries, groups iterated in stable order
//! 5. **Role grant** - role entries, capped by the role matrix ceiling
//! 6. **Tenant default** - tenant visibility or an explicit tenant entry
//! 7. **Public visibility** - public visibility or an explicit public entry
//! 8. **Implicit deny** - nothing matched

pub mod evaluator;
pub mod types;

pub use evaluator::evaluate;
pub use types::{Decision, ReasonCode, Verdict};
