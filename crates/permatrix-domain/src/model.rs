use crate::roles::Role;
use permatrix_types::ids::ACTION_VIEW;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Stored value of one action inside a [`PermissionNode`].
///
/// `Unspecified` covers values the store held that are neither truthy nor falsy
/// (`null`, arrays, unknown strings). It never grants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Grant {
    Allowed,
    Denied,
    #[default]
    Unspecified,
}

impl Grant {
    pub fn is_allowed(self) -> bool {
        self == Grant::Allowed
    }
}

impl From<bool> for Grant {
    fn from(value: bool) -> Self {
        if value { Grant::Allowed } else { Grant::Denied }
    }
}

impl Serialize for Grant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Grant::Allowed => serializer.serialize_bool(true),
            Grant::Denied => serializer.serialize_bool(false),
            Grant::Unspecified => serializer.serialize_none(),
        }
    }
}

/// Action name -> grant for one `(role, page, tab)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionNode {
    pub actions: BTreeMap<String, Grant>,
}

impl PermissionNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, bool)]) -> Self {
        Self {
            actions: pairs
                .iter()
                .map(|(action, allowed)| (action.to_string(), Grant::from(*allowed)))
                .collect(),
        }
    }

    pub fn with(mut self, action: &str, allowed: bool) -> Self {
        self.actions.insert(action.to_string(), Grant::from(allowed));
        self
    }

    /// Raw stored grant; a missing key reads as `Unspecified`.
    pub fn stored(&self, action: &str) -> Grant {
        self.actions.get(action).copied().unwrap_or_default()
    }

    pub fn view(&self) -> Grant {
        self.stored(ACTION_VIEW)
    }

    /// Effective grant with the view dependency applied: every action other than
    /// `view` reads as not granted while `view` is not granted, whatever is stored.
    pub fn grants(&self, action: &str) -> bool {
        if action == ACTION_VIEW {
            return self.view().is_allowed();
        }
        self.view().is_allowed() && self.stored(action).is_allowed()
    }
}

/// Tab key -> node for one page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PagePolicy {
    pub tabs: BTreeMap<String, PermissionNode>,
}

impl PagePolicy {
    pub fn tab(&self, tab: &str) -> Option<&PermissionNode> {
        self.tabs.get(tab)
    }
}

/// Page key -> tabs for one role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RolePolicy {
    pub pages: BTreeMap<String, PagePolicy>,
}

impl RolePolicy {
    pub fn page(&self, page: &str) -> Option<&PagePolicy> {
        self.pages.get(page)
    }

    pub fn node(&self, page: &str, tab: &str) -> Option<&PermissionNode> {
        self.page(page).and_then(|p| p.tab(tab))
    }
}

/// The full Role -> Page -> Tab -> Action table.
///
/// Role keys keep the spelling they were stored with; lookups go through
/// [`Role::matches_key`]. Deserialization funnels through the lenient ingestion in
/// [`Matrix::from_json`], so malformed shapes become absent entries instead of errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Matrix {
    pub roles: BTreeMap<String, RolePolicy>,
}

impl Matrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Policy stored for `role`, preferring an exact key over a case-insensitive match.
    pub fn role_policy(&self, role: &Role) -> Option<&RolePolicy> {
        if let Some(policy) = self.roles.get(role.as_str()) {
            return Some(policy);
        }
        self.roles
            .iter()
            .find(|(key, _)| role.matches_key(key))
            .map(|(_, policy)| policy)
    }

    pub fn set_node(&mut self, role: &str, page: &str, tab: &str, node: PermissionNode) {
        self.roles
            .entry(role.to_string())
            .or_default()
            .pages
            .entry(page.to_string())
            .or_default()
            .tabs
            .insert(tab.to_string(), node);
    }

    pub fn with_node(mut self, role: &str, page: &str, tab: &str, node: PermissionNode) -> Self {
        self.set_node(role, page, tab, node);
        self
    }

    /// Every `(page, tab)` key present under any role, sorted and deduplicated.
    pub fn known_tabs(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .roles
            .values()
            .flat_map(|r| {
                r.pages.iter().flat_map(|(page, p)| {
                    p.tabs.keys().map(move |tab| (page.clone(), tab.clone()))
                })
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Only maps, strings, bools and nulls: serialization cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Matrix::from_json(&value))
    }
}
