//! Use case orchestration for permatrix.
//!
//! This crate provides the application layer: the request gate, the capability service and the
//! policy editor, all reading the same store through the same snapshot type. It is intentionally
//! thin and delegates evaluation to the domain crate.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod capability;
mod editor;
mod gate;
mod identity;
mod snapshot;

use anyhow::Context;
use permatrix_settings::{Overrides, PermatrixConfigV1, ResolvedConfig};
use permatrix_types::Decision;

pub use capability::{CapabilityService, RecordRef};
pub use editor::{EditError, EditReceipt, PolicyEditor};
pub use gate::{GateOutcome, GateRequest, RequestGate};
pub use identity::{IdentityError, IdentityProvider, RawIdentity, StaticIdentities};
pub use snapshot::PolicySnapshot;

/// Parse and resolve config text (empty is allowed, defaults apply).
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        PermatrixConfigV1::default()
    } else {
        permatrix_settings::parse_config_toml(config_text).context("parse config")?
    };
    permatrix_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Map a gate decision to a process exit code (0 = allow, 2 = deny).
pub fn decision_exit_code(decision: &Decision) -> i32 {
    if decision.is_allowed() { 0 } else { 2 }
}
