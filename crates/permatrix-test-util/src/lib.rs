//! Shared test utilities for the permatrix workspace.
//!
//! Domain properties, app-level gate tests and CLI tests all evaluate against the
//! fixture matrices defined here. The files under `tests/fixtures/` at the repo root must stay equal to
//! the functions below (checked by this crate's tests).

use serde_json::Value;
use std::path::PathBuf;

pub mod fixtures {
    use serde_json::{Value, json};

    /// A realistic platform configuration with every role/page/tab spelled out.
    pub fn platform_matrix() -> Value {
        json!({
            "Guest": {
                "dockets": { "list": { "view": false } }
            },
            "Staff": {
                "customers": {
                    "list": { "view": true },
                    "detail": { "view": false, "edit": false }
                },
                "dockets": {
                    "list": { "view": true, "print": true },
                    "detail": { "view": true, "edit": false, "print": true }
                },
                "jobForms": {
                    "forms": { "view": true, "submit": true },
                    "designTool": { "view": false, "edit": false }
                },
                "submissions": {
                    "list": { "view": false }
                },
                "timesheets": {
                    "list": { "view": true, "create": true, "edit": true, "approve": false }
                }
            },
            "Supervisor": {
                "customers": {
                    "list": { "view": true },
                    "detail": { "view": true, "edit": true }
                },
                "dockets": {
                    "list": { "view": true, "create": true, "print": true },
                    "detail": { "view": true, "edit": true, "print": true, "delete": false }
                },
                "jobForms": {
                    "forms": { "view": true, "submit": true },
                    "designTool": { "view": true, "edit": true }
                },
                "submissions": {
                    "list": { "view": true, "submit": true }
                },
                "timesheets": {
                    "list": { "view": true, "edit": true, "approve": true }
                }
            }
        })
    }

    /// `edit` stored as granted under a tab whose `view` is not.
    pub fn dirty_view_matrix() -> Value {
        json!({
            "Staff": {
                "jobForms": { "designTool": { "view": false, "edit": true } }
            }
        })
    }

    /// A node that exists but only grants `view`.
    pub fn staff_dockets_list_matrix() -> Value {
        json!({
            "Staff": {
                "dockets": { "list": { "view": true } }
            }
        })
    }

    /// Data as older editors stored it: string/number booleans, lower-case role keys,
    /// and a few malformed levels.
    pub fn legacy_matrix() -> Value {
        json!({
            "staff": {
                "dockets": {
                    "list": { "view": "true", "print": 1 },
                    "detail": "hidden"
                },
                "timesheets": {
                    "list": { "view": "1", "edit": "true", "approve": "false" }
                }
            },
            "guest": ["dockets"]
        })
    }
}

/// Repo-root `tests/fixtures` directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(|root| root.join("tests").join("fixtures"))
        .unwrap_or_else(|| PathBuf::from("tests/fixtures"))
}

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// `replaced_at` timestamps are replaced at any depth; their placeholder is fixed
/// and cannot collide with real data.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    normalize_recursive(&mut value);
    value
}

fn normalize_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.contains_key("replaced_at") {
                map.insert(
                    "replaced_at".to_string(),
                    Value::String("__TIMESTAMP__".to_string()),
                );
            }
            for (_, v) in map.iter_mut() {
                normalize_recursive(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                normalize_recursive(v);
            }
        }
        _ => {}
    }
}
