use crate::PolicyStore;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use permatrix_domain::Matrix;
use std::io::Write;
use std::sync::Arc;

/// Matrix persisted as one JSON document.
///
/// Writes go to a temporary file in the same directory and are renamed over the
/// target, so a reader opens either the old document or the new one.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: Utf8PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl PolicyStore for FileStore {
    fn read(&self) -> anyhow::Result<Option<Arc<Matrix>>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path, "policy file absent");
                return Ok(None);
            }
            Err(err) => return Err(err).with_context(|| format!("read {}", self.path)),
        };
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parse policy matrix {}", self.path))?;
        Ok(Some(Arc::new(Matrix::from_json(&value))))
    }

    fn replace(&self, matrix: Matrix) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).with_context(|| format!("create {dir}"))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("create temporary file in {dir}"))?;
        let body = serde_json::to_string_pretty(&matrix.to_json())
            .context("serialize policy matrix")?;
        tmp.write_all(body.as_bytes())
            .and_then(|()| tmp.write_all(b"\n"))
            .and_then(|()| tmp.as_file().sync_all())
            .with_context(|| format!("write temporary file for {}", self.path))?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("replace {}", self.path))?;

        tracing::info!(path = %self.path, roles = matrix.roles.len(), "policy matrix written");
        Ok(())
    }
}
