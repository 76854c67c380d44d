//! Pure policy evaluation (no IO).
//!
//! Input: a matrix snapshot handed in by the caller, a canonical role, and a requirement.
//! Output: a boolean decision. Nothing here reads the environment or holds global state, so
//! the request gate and the capability mirror share one evaluator.

#![forbid(unsafe_code)]

pub mod capability;
pub mod identity;
pub mod invariants;
pub mod model;
pub mod ownership;
pub mod roles;

mod engine;
mod ingest;

pub use capability::{Capabilities, VisiblePage};
pub use engine::{evaluate, evaluate_triple};
pub use identity::Identity;
pub use invariants::{InvariantViolation, find_violations, validate};
pub use model::{Grant, Matrix, PagePolicy, PermissionNode, RolePolicy};
pub use ownership::{ListScope, Owned, OwnershipContext, OwnershipGuard};
pub use roles::{Role, RoleNormalizer};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
