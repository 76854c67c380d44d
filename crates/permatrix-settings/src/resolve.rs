use crate::{model::PermatrixConfigV1, presets};
use anyhow::Context;
use permatrix_domain::{OwnershipGuard, Role, RoleNormalizer};
use std::collections::BTreeMap;

/// Values supplied on the command line or through the environment. They win over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub preset: Option<String>,
    pub diagnostics: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub preset: String,
    pub normalizer: RoleNormalizer,
    pub ownership: OwnershipGuard,
    pub diagnostics: bool,
}

pub fn resolve_config(
    cfg: PermatrixConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let preset_name = overrides
        .preset
        .clone()
        .or(cfg.preset.clone())
        .unwrap_or_else(|| "default".to_string());

    let preset = presets::preset(&preset_name).with_context(|| {
        format!("unknown preset: {preset_name} (expected 'default' or 'minimal')")
    })?;

    let mut normalizer = preset.normalizer;

    for literal in &cfg.roles.bypass {
        if literal.trim().is_empty() {
            anyhow::bail!("bypass role literal must not be blank");
        }
        normalizer = normalizer.with_bypass(literal);
    }

    for name in &cfg.roles.registered {
        let role = Role::new(name);
        if role.as_str().is_empty() {
            anyhow::bail!("registered role name must not be blank");
        }
        if role.is_guest() || role.is_bypass() {
            anyhow::bail!("registered role {name} shadows a built-in role");
        }
        if !role.as_str().chars().next().is_some_and(char::is_uppercase) {
            anyhow::bail!(
                "registered role {name} must use its canonical spelling, starting with an uppercase letter"
            );
        }
        normalizer = normalizer.with_role(role.as_str());
    }

    // Targets are checked against the table as it stands before any config alias lands,
    // so aliases cannot chain.
    let known = normalizer.canonical_roles();
    for (alias, target) in &cfg.roles.aliases {
        let canonical = canonical_spelling(&known, target)
            .with_context(|| format!("invalid alias {alias}"))?;
        normalizer = normalizer.with_alias(alias, canonical.as_str());
    }

    let mut families: BTreeMap<String, Vec<Role>> = preset.ownership;
    for (family, roles) in &cfg.ownership {
        let resolved = roles
            .iter()
            .map(|r| self_scoped_role(&known, r))
            .collect::<anyhow::Result<Vec<Role>>>()
            .with_context(|| format!("invalid self-scoped roles for {family}"))?;
        families.insert(family.clone(), resolved);
    }

    let ownership = families
        .into_iter()
        .flat_map(|(family, roles)| roles.into_iter().map(move |r| (family.clone(), r)))
        .fold(OwnershipGuard::new(), |guard, (family, role)| {
            guard.with_self_scoped(&family, role)
        });

    let diagnostics = overrides.diagnostics.or(cfg.diagnostics).unwrap_or(false);

    Ok(ResolvedConfig {
        preset: preset.name.to_string(),
        normalizer,
        ownership,
        diagnostics,
    })
}

/// The bypass role is never subject to ownership checks.
fn self_scoped_role(known: &[Role], name: &str) -> anyhow::Result<Role> {
    let role = canonical_spelling(known, name)?;
    if role.is_bypass() {
        anyhow::bail!("bypass role {role} cannot be self-scoped");
    }
    Ok(role)
}

fn canonical_spelling(known: &[Role], name: &str) -> anyhow::Result<Role> {
    known
        .iter()
        .find(|r| r.matches_key(name))
        .cloned()
        .with_context(|| {
            let names: Vec<&str> = known.iter().map(Role::as_str).collect();
            format!("unknown role: {name} (expected one of {})", names.join(", "))
        })
}
