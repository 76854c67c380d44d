//! Config parsing and preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.
//! Reading `permatrix.toml` and the environment is the caller's job.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{PermatrixConfigV1, RolesConfig, SCHEMA_CONFIG_V1};
pub use presets::seed_matrix;
pub use resolve::{Overrides, ResolvedConfig};

/// Environment variable that turns on diagnostic denial detail.
pub const DIAGNOSTICS_ENV: &str = "PERMATRIX_DIAGNOSTICS";

/// Parse `permatrix.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PermatrixConfigV1> {
    let cfg: PermatrixConfigV1 = toml::from_str(input)?;
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }
    Ok(cfg)
}

/// Resolve the effective config (preset + file + overrides).
pub fn resolve_config(
    cfg: PermatrixConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// Interpret a `PERMATRIX_DIAGNOSTICS` value. Anything unrecognised keeps production mode.
pub fn diagnostics_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
