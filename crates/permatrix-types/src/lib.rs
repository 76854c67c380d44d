//! Stable DTOs and IDs used across the permatrix workspace.
//!
//! This crate is intentionally boring:
//! - canonical role and action names
//! - requirement declarations (single triple or OR-list)
//! - decision/denial payloads returned by the request gate
//! - the static catalog of protected operations

#![forbid(unsafe_code)]

pub mod catalog;
pub mod decision;
pub mod ids;
pub mod requirement;

pub use catalog::{ProtectedOperation, all_operation_ids, lookup_operation};
pub use decision::{Decision, DenialDetail, Outcome, SCHEMA_DECISION_V1};
pub use requirement::{Requirement, Triple};
