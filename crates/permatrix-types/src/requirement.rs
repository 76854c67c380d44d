use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single `(page, tab, action)` access query.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Triple {
    pub page: String,
    pub tab: String,
    pub action: String,
}

impl Triple {
    pub fn new(page: impl Into<String>, tab: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            tab: tab.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.page, self.tab, self.action)
    }
}

impl FromStr for Triple {
    type Err = String;

    /// Parses the display form, `page/tab:action`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, action) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected page/tab:action, got `{s}`"))?;
        let (page, tab) = path
            .split_once('/')
            .ok_or_else(|| format!("expected page/tab:action, got `{s}`"))?;
        if [page, tab, action].iter().any(|part| part.trim().is_empty()) {
            return Err(format!("empty component in `{s}`"));
        }
        Ok(Triple::new(page.trim(), tab.trim(), action.trim()))
    }
}

/// What a protected operation demands of the caller's role.
///
/// `AnyOf` lists alternative paths to the same action; it is satisfied when any
/// alternative is. An empty list is never satisfied.
///
/// Wire shape: a bare triple object, or `{ "or": [triple, ...] }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Requirement {
    Single(Triple),
    AnyOf {
        #[serde(rename = "or")]
        alternatives: Vec<Triple>,
    },
}

impl Requirement {
    pub fn single(page: impl Into<String>, tab: impl Into<String>, action: impl Into<String>) -> Self {
        Requirement::Single(Triple::new(page, tab, action))
    }

    pub fn any_of(alternatives: Vec<Triple>) -> Self {
        Requirement::AnyOf { alternatives }
    }

    /// Same action reachable through two page/tab paths.
    pub fn either(
        (page_a, tab_a): (&str, &str),
        (page_b, tab_b): (&str, &str),
        action: &str,
    ) -> Self {
        Requirement::any_of(vec![
            Triple::new(page_a, tab_a, action),
            Triple::new(page_b, tab_b, action),
        ])
    }

    /// Triples in declaration order.
    pub fn triples(&self) -> &[Triple] {
        match self {
            Requirement::Single(t) => std::slice::from_ref(t),
            Requirement::AnyOf { alternatives } => alternatives,
        }
    }

    /// Action reported in diagnostics: the first alternative's.
    pub fn primary_action(&self) -> Option<&str> {
        self.triples().first().map(|t| t.action.as_str())
    }
}

impl From<Triple> for Requirement {
    fn from(value: Triple) -> Self {
        Requirement::Single(value)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Single(t) => write!(f, "{t}"),
            Requirement::AnyOf { alternatives } => {
                let parts: Vec<String> = alternatives.iter().map(|t| t.to_string()).collect();
                write!(f, "any of [{}]", parts.join(", "))
            }
        }
    }
}
