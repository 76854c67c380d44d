use crate::PolicyStore;
use permatrix_domain::Matrix;
use std::sync::{Arc, RwLock};

/// Process-local store. The write lock is held only for the pointer swap.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: RwLock<Option<Arc<Matrix>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matrix(matrix: Matrix) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(matrix))),
        }
    }
}

impl PolicyStore for MemoryStore {
    fn read(&self) -> anyhow::Result<Option<Arc<Matrix>>> {
        let guard = self
            .current
            .read()
            .map_err(|_| anyhow::anyhow!("policy store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn replace(&self, matrix: Matrix) -> anyhow::Result<()> {
        let next = Arc::new(matrix);
        let previous = {
            let mut guard = self
                .current
                .write()
                .map_err(|_| anyhow::anyhow!("policy store lock poisoned"))?;
            guard.replace(next)
        };
        // Old snapshot is released outside the lock; readers may still hold it.
        drop(previous);
        tracing::debug!("in-memory policy matrix replaced");
        Ok(())
    }
}
