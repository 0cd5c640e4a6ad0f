//! Writing staged artifacts to disk
//!
//! Flushes one emitter's [`MemoryFS`] to the host filesystem.
//!
//! ## Process
//!
//! 1.  **Remove stale artifacts**: files in the output directory matching
//!     the emitter's stale patterns are deleted first, so artifacts for
//!     configurations that no longer exist disappear.
//!
//! 2.  **Create directories**: parent directories are created recursively.
//!
//! 3.  **Write content**: existing files that are read-only (generated files
//!     are often checked in locked) are made writable first. New files get
//!     the staged permissions; existing files keep theirs.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;

/// Write every staged file. Relative paths are placed under `output_path`.
///
/// Returns the written paths in staging order.
pub fn execute(staged: &MemoryFS, output_path: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(staged.len());
    for (path, file) in staged.files() {
        let full_path = output_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", parent.display(), e),
            })?;
        }

        let existed = full_path.exists();
        if existed {
            make_writable(&full_path)?;
        }

        fs::write(&full_path, &file.content).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", full_path.display(), e),
        })?;

        #[cfg(unix)]
        if !existed {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(file.permissions);
            fs::set_permissions(&full_path, perms).map_err(|e| Error::Filesystem {
                message: format!(
                    "Failed to set permissions on '{}': {}",
                    full_path.display(),
                    e
                ),
            })?;
        }

        debug!("Wrote {}", full_path.display());
        written.push(full_path);
    }

    Ok(written)
}

/// Delete files in `output_path` matching any of `patterns`.
pub fn remove_stale(output_path: &Path, patterns: &[String]) -> Result<()> {
    for pattern in patterns {
        let full_pattern = output_path.join(pattern);
        for entry in glob::glob(&full_pattern.to_string_lossy())? {
            let Ok(path) = entry else { continue };
            if !path.is_file() {
                continue;
            }
            make_writable(&path)?;
            fs::remove_file(&path).map_err(|e| Error::Filesystem {
                message: format!("Failed to remove '{}': {}", path.display(), e),
            })?;
            debug!("Removed stale {}", path.display());
        }
    }
    Ok(())
}

fn make_writable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to read metadata of '{}': {}", path.display(), e),
    })?;
    let mut perms = metadata.permissions();
    if !perms.readonly() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o200);
    }
    #[cfg(not(unix))]
    perms.set_readonly(false);

    fs::set_permissions(path, perms).map_err(|e| Error::Filesystem {
        message: format!("Failed to make '{}' writable: {}", path.display(), e),
    })
}
