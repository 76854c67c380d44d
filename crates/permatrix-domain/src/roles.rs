//! Canonical roles and the raw-role normalizer.
//!
//! Every role-string comparison in the workspace goes through this module.

use permatrix_types::ids::{
    ROLE_ADMINISTRATOR, ROLE_GUEST, ROLE_STAFF, ROLE_SUPERVISOR,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A canonical role name, as produced by [`RoleNormalizer::normalize`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        Role(name.as_ref().trim().to_string())
    }

    pub fn guest() -> Self {
        Role(ROLE_GUEST.to_string())
    }

    pub fn administrator() -> Self {
        Role(ROLE_ADMINISTRATOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bypass roles evaluate to allow before the matrix is consulted.
    pub fn is_bypass(&self) -> bool {
        self.matches_key(ROLE_ADMINISTRATOR)
    }

    pub fn is_guest(&self) -> bool {
        self.matches_key(ROLE_GUEST)
    }

    /// Whether a role key stored in a matrix or config names this role.
    pub fn matches_key(&self, key: &str) -> bool {
        fold(&self.0) == fold(key)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps raw identity roles to canonical roles.
///
/// Lookup is case-insensitive. Bypass aliases are checked before the alias table,
/// so no alias can turn a bypass literal into an ordinary role. Absent, blank or
/// unknown input normalizes to `Guest`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleNormalizer {
    aliases: BTreeMap<String, Role>,
    bypass: BTreeSet<String>,
}

impl RoleNormalizer {
    /// Empty table: everything except the bypass role names normalizes to `Guest`.
    pub fn new() -> Self {
        Self::default().with_bypass(ROLE_ADMINISTRATOR).with_role(ROLE_GUEST)
    }

    /// Built-in table shipped with the platform.
    pub fn standard() -> Self {
        Self::new()
            .with_bypass("admin")
            .with_role(ROLE_STAFF)
            .with_role(ROLE_SUPERVISOR)
            .with_alias("user", ROLE_STAFF)
            .with_alias("employee", ROLE_STAFF)
            .with_alias("manager", ROLE_SUPERVISOR)
    }

    /// Register a canonical role under its own name.
    pub fn with_role(self, canonical: &str) -> Self {
        self.with_alias(canonical, canonical)
    }

    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Self {
        self.aliases.insert(fold(alias), Role::new(canonical));
        self
    }

    pub fn with_bypass(mut self, alias: &str) -> Self {
        self.bypass.insert(fold(alias));
        self
    }

    pub fn normalize(&self, raw: Option<&str>) -> Role {
        let Some(raw) = raw else {
            return Role::guest();
        };
        let key = fold(raw);
        if key.is_empty() {
            return Role::guest();
        }
        if self.bypass.contains(&key) {
            return Role::administrator();
        }
        self.aliases.get(&key).cloned().unwrap_or_else(Role::guest)
    }

    /// Whether `raw` is known to the table (as an alias, canonical name or bypass literal).
    pub fn recognizes(&self, raw: &str) -> bool {
        let key = fold(raw);
        self.bypass.contains(&key) || self.aliases.contains_key(&key)
    }

    /// Distinct canonical roles reachable through the table, bypass role included.
    pub fn canonical_roles(&self) -> Vec<Role> {
        let mut out: Vec<Role> = self.aliases.values().cloned().collect();
        out.push(Role::administrator());
        out.sort();
        out.dedup();
        out
    }
}

/// The one case-folding rule for role names, shared by the normalizer and key matching.
fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}
