use permatrix_domain::{Matrix, Role, evaluate};
use permatrix_store::PolicyStore;
use permatrix_types::Requirement;
use std::sync::Arc;

/// The matrix one evaluation runs against, read once from the store.
///
/// The gate and the capability service both load through here, so a store failure
/// degrades them the same way.
#[derive(Clone, Debug)]
pub enum PolicySnapshot {
    Ready(Arc<Matrix>),
    /// The store could not be read. Every non-bypass evaluation denies.
    Unavailable,
}

impl PolicySnapshot {
    /// A store that has never been written reads as an empty matrix.
    pub fn load(store: &dyn PolicyStore) -> Self {
        match store.read() {
            Ok(Some(matrix)) => PolicySnapshot::Ready(matrix),
            Ok(None) => PolicySnapshot::Ready(Arc::new(Matrix::new())),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "policy store read failed; denying");
                PolicySnapshot::Unavailable
            }
        }
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        match self {
            PolicySnapshot::Ready(matrix) => Some(matrix),
            PolicySnapshot::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, PolicySnapshot::Ready(_))
    }

    pub fn evaluate(&self, role: &Role, requirement: &Requirement) -> bool {
        if role.is_bypass() {
            return true;
        }
        match self.matrix() {
            Some(matrix) => evaluate(matrix, role, requirement),
            None => false,
        }
    }
}
