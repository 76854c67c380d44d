use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable schema identifier for `permatrix.toml`.
pub const SCHEMA_CONFIG_V1: &str = "permatrix.config.v1";

/// `permatrix.toml` schema v1.
///
/// Every field is optional; anything omitted comes from the selected preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PermatrixConfigV1 {
    /// Optional schema string for tooling (`permatrix.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Built-in preset to start from: `default` or `minimal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Include role and requirement detail in denials. Off in production.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<bool>,

    #[serde(default)]
    pub roles: RolesConfig,

    /// Resource family -> self-scoped canonical roles.
    ///
    /// A family listed here replaces the preset's entry; an empty list turns
    /// self-scoping off for that family.
    #[serde(default)]
    pub ownership: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RolesConfig {
    /// Raw role literals that map to the bypass role. Added to the preset's.
    #[serde(default)]
    pub bypass: Vec<String>,

    /// Created roles, in canonical spelling. They normalize to themselves.
    #[serde(default)]
    pub registered: Vec<String>,

    /// Raw alias -> canonical role. Merged over the preset's table.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}
