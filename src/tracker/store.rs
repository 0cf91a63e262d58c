use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::fs::{ensure_parent_dir, normalize_rel_path};

/// Key/value object storage used for persisted job records.
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object. Returns the normalized key.
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> ReelResult<String>;
}

/// Stores objects as files below a root directory. The content type is not persisted.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> ReelResult<PathBuf> {
        Ok(self.root.join(normalize_rel_path(key)?))
    }
}

impl ObjectStore for DirectoryStore {
    fn put(&self, key: &str, body: &[u8], _content_type: &str) -> ReelResult<String> {
        let key = normalize_rel_path(key)?;
        let path = self.root.join(&key);
        ensure_parent_dir(&path).map_err(|e| ReelError::upstream(e.to_string()))?;
        std::fs::write(&path, body).map_err(|e| {
            ReelError::upstream(format!("failed to write '{}': {e}", path.display()))
        })?;
        Ok(key)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails with an upstream error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            objects: Mutex::default(),
            failure: Some(reason.into()),
        }
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        let objects = match self.objects.lock() {
            Ok(o) => o,
            Err(poisoned) => poisoned.into_inner(),
        };
        objects.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        match self.objects.lock() {
            Ok(o) => o.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> ReelResult<String> {
        if let Some(reason) = &self.failure {
            return Err(ReelError::upstream(reason.clone()));
        }
        let key = normalize_rel_path(key)?;
        let mut objects = match self.objects.lock() {
            Ok(o) => o,
            Err(poisoned) => poisoned.into_inner(),
        };
        objects.insert(
            key.clone(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_owned(),
            },
        );
        Ok(key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracker/store.rs"]
mod tests;
