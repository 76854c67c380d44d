//! Write-time validation of the view dependency.
//!
//! The evaluator already refuses to honour an action whose `view` is not granted;
//! this rejects such matrices before they are persisted so stored data stays clean.

use crate::model::Matrix;
use permatrix_types::ids::ACTION_VIEW;
use thiserror::Error;

/// An action stored as granted on a node whose `view` is not granted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("action `{action}` is granted on {role}/{page}/{tab} while `view` is not")]
pub struct InvariantViolation {
    pub role: String,
    pub page: String,
    pub tab: String,
    pub action: String,
}

/// Every violation, in role/page/tab/action key order.
pub fn find_violations(matrix: &Matrix) -> Vec<InvariantViolation> {
    let mut out = Vec::new();
    for (role, policy) in &matrix.roles {
        for (page, page_policy) in &policy.pages {
            for (tab, node) in &page_policy.tabs {
                if node.view().is_allowed() {
                    continue;
                }
                for (action, grant) in &node.actions {
                    if action != ACTION_VIEW && grant.is_allowed() {
                        out.push(InvariantViolation {
                            role: role.clone(),
                            page: page.clone(),
                            tab: tab.clone(),
                            action: action.clone(),
                        });
                    }
                }
            }
        }
    }
    out
}

/// First violation in key order, if any.
pub fn validate(matrix: &Matrix) -> Result<(), InvariantViolation> {
    match find_violations(matrix).into_iter().next() {
        Some(v) => Err(v),
        None => Ok(()),
    }
}
