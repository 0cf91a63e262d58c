use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Normalize a relative object key: `\` becomes `/`, empty and `.` segments are dropped.
///
/// Absolute keys and keys containing `..` are rejected so a key can never escape its root.
pub(crate) fn normalize_rel_path(key: &str) -> ReelResult<String> {
    let s = key.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::config(format!("object key '{key}' must be relative")));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::config(format!("object key '{key}' must not contain '..'")));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::config("object key must contain a file name"));
    }
    Ok(out.join("/"))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;
