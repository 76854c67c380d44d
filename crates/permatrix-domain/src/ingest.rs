//! Ingestion boundary: persisted JSON -> typed [`Matrix`].
//!
//! Stored data is heterogeneous (older editors wrote `"true"` strings and `1`s).
//! This is the one place loose values are coerced. Anything with the wrong shape at
//! a level is dropped, so the evaluator sees it as absent configuration.

use crate::model::{Grant, Matrix, PagePolicy, PermissionNode, RolePolicy};
use serde_json::{Map, Value};

impl Matrix {
    /// Build a matrix from whatever the store held. Never fails.
    pub fn from_json(value: &Value) -> Matrix {
        let Some(roles) = value.as_object() else {
            return Matrix::default();
        };
        Matrix {
            roles: roles
                .iter()
                .filter_map(|(role, v)| Some((role.clone(), role_policy(v.as_object()?))))
                .collect(),
        }
    }
}

fn role_policy(pages: &Map<String, Value>) -> RolePolicy {
    RolePolicy {
        pages: pages
            .iter()
            .filter_map(|(page, v)| Some((page.clone(), page_policy(v.as_object()?))))
            .collect(),
    }
}

fn page_policy(tabs: &Map<String, Value>) -> PagePolicy {
    PagePolicy {
        tabs: tabs
            .iter()
            .filter_map(|(tab, v)| Some((tab.clone(), node(v.as_object()?))))
            .collect(),
    }
}

fn node(actions: &Map<String, Value>) -> PermissionNode {
    PermissionNode {
        actions: actions
            .iter()
            .map(|(action, v)| (action.clone(), coerce_grant(v)))
            .collect(),
    }
}

/// Known leniency: `"true"`, `"1"` and non-zero numbers grant; `"false"`, `"0"`, `""`
/// and zero deny. Everything else is `Unspecified`.
pub(crate) fn coerce_grant(value: &Value) -> Grant {
    match value {
        Value::Bool(b) => Grant::from(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f != 0.0 => Grant::Allowed,
            Some(_) => Grant::Denied,
            None => Grant::Unspecified,
        },
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") || s == "1" {
                Grant::Allowed
            } else if s.eq_ignore_ascii_case("false") || s == "0" || s.is_empty() {
                Grant::Denied
            } else {
                Grant::Unspecified
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => Grant::Unspecified,
    }
}
