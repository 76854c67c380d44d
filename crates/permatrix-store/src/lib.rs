//! Policy store adapters: hold the current matrix snapshot and replace it whole.
//!
//! This crate is allowed to do filesystem IO. It performs no validation; the policy
//! editor checks invariants before calling [`PolicyStore::replace`].

#![forbid(unsafe_code)]

mod file;
mod memory;

use permatrix_domain::Matrix;
use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Owner of the current matrix snapshot.
///
/// Readers get an immutable snapshot and keep it for the whole evaluation; a concurrent
/// `replace` never changes a snapshot already handed out.
pub trait PolicyStore: Send + Sync {
    /// `Ok(None)` when nothing has been written yet.
    fn read(&self) -> anyhow::Result<Option<Arc<Matrix>>>;

    /// Replace the whole matrix. There is no merge.
    fn replace(&self, matrix: Matrix) -> anyhow::Result<()>;
}

impl<S: PolicyStore + ?Sized> PolicyStore for Arc<S> {
    fn read(&self) -> anyhow::Result<Option<Arc<Matrix>>> {
        (**self).read()
    }

    fn replace(&self, matrix: Matrix) -> anyhow::Result<()> {
        (**self).replace(matrix)
    }
}
