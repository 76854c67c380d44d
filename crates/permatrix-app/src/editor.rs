//! The policy editor: validate a full replacement matrix, then write it in one step.

use permatrix_domain::{InvariantViolation, Matrix, validate};
use permatrix_store::PolicyStore;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("matrix rejected: action `{action}` is granted on {role}/{page}/{tab} while `view` is not")]
    InvariantViolation {
        role: String,
        page: String,
        tab: String,
        action: String,
    },
    #[error("matrix rejected: document must be a JSON object keyed by role")]
    NotAMatrix,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<InvariantViolation> for EditError {
    fn from(v: InvariantViolation) -> Self {
        EditError::InvariantViolation {
            role: v.role,
            page: v.page,
            tab: v.tab,
            action: v.action,
        }
    }
}

/// Summary of an accepted replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditReceipt {
    #[serde(with = "time::serde::rfc3339")]
    pub replaced_at: OffsetDateTime,
    pub added_roles: Vec<String>,
    pub removed_roles: Vec<String>,
    pub changed_roles: Vec<String>,
}

impl EditReceipt {
    fn between(previous: &Matrix, next: &Matrix) -> Self {
        let added_roles = next
            .roles
            .keys()
            .filter(|k| !previous.roles.contains_key(*k))
            .cloned()
            .collect();
        let removed_roles = previous
            .roles
            .keys()
            .filter(|k| !next.roles.contains_key(*k))
            .cloned()
            .collect();
        let changed_roles = next
            .roles
            .iter()
            .filter(|(k, policy)| previous.roles.get(*k).is_some_and(|p| p != *policy))
            .map(|(k, _)| k.clone())
            .collect();
        Self {
            replaced_at: OffsetDateTime::now_utc(),
            added_roles,
            removed_roles,
            changed_roles,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.added_roles.is_empty() && self.removed_roles.is_empty() && self.changed_roles.is_empty()
    }
}

pub struct PolicyEditor {
    store: Arc<dyn PolicyStore>,
}

impl PolicyEditor {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// The stored matrix, or an empty one if nothing was ever written.
    pub fn current(&self) -> anyhow::Result<Matrix> {
        Ok(self
            .store
            .read()?
            .map(|m| Matrix::clone(&m))
            .unwrap_or_default())
    }

    /// Replace the whole matrix. A matrix violating the view dependency is rejected
    /// before anything is written; the first offender in key order is reported.
    pub fn replace(&self, next: Matrix) -> Result<EditReceipt, EditError> {
        if let Err(violation) = validate(&next) {
            tracing::warn!(%violation, "matrix replacement rejected");
            return Err(violation.into());
        }

        let previous = match self.store.read() {
            Ok(current) => current.map(|m| Matrix::clone(&m)).unwrap_or_default(),
            Err(err) => {
                // An unreadable store must still be repairable by a full replacement.
                tracing::warn!(error = %format!("{err:#}"), "previous matrix unreadable");
                Matrix::new()
            }
        };
        let receipt = EditReceipt::between(&previous, &next);

        self.store.replace(next)?;
        tracing::info!(
            added = ?receipt.added_roles,
            removed = ?receipt.removed_roles,
            changed = ?receipt.changed_roles,
            "policy matrix replaced"
        );
        Ok(receipt)
    }

    /// Replace from a stored-format document, coercing legacy values first.
    pub fn replace_json(&self, document: &serde_json::Value) -> Result<EditReceipt, EditError> {
        if !document.is_object() {
            return Err(EditError::NotAMatrix);
        }
        self.replace(Matrix::from_json(document))
    }

    /// Write `seed` only when the store holds no matrix. Returns `None` when one exists.
    pub fn seed_if_absent(&self, seed: Matrix) -> Result<Option<EditReceipt>, EditError> {
        if self.store.read()?.is_some() {
            tracing::debug!("policy matrix present; not seeding");
            return Ok(None);
        }
        let receipt = self.replace(seed)?;
        tracing::info!(roles = receipt.added_roles.len(), "policy matrix seeded");
        Ok(Some(receipt))
    }
}
