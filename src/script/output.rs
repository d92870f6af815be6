//! Writing rendered scripts to disk
//!
//! Output is all-or-nothing: the script is rendered completely before the file system is
//! touched, then written to a temporary file next to the target and renamed over it. A
//! failed render or write never creates or truncates the target.

use super::builder::Script;
use super::error::{Result, ScriptError};
use std::fs::{self, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| ScriptError::io(dir, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| ScriptError::io(file.path(), e))?;

    // Temp files are created owner-only; keep the target's mode or use a regular file mode
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| ScriptError::io(file.path(), e))?;
    }
    file.persist(path)
        .map_err(|e| ScriptError::io(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

impl Script {
    /// Where `path` ends up, relative paths being resolved against the root directory
    pub fn output_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.options().root_dir.join(path)
    }

    /// Render the script and write it, UTF-8 encoded, to `path`
    ///
    /// Returns the resolved path that was written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let target = self.output_path(path);
        let document = self.render()?;
        write_atomic(&target, &document)?;
        tracing::debug!(path = %target.display(), bytes = document.len(), "wrote script");
        Ok(target)
    }
}
