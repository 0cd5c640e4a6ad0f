//! Skip-if-unchanged gate
//!
//! A run is fingerprinted by hashing its parameters and the parsed settings
//! document. When the fingerprint equals the one stored by the previous
//! successful run, nothing needs to be generated again.
//!
//! The stored fingerprint is the only state that survives between runs. It
//! is written after every artifact has been emitted, so a failed run never
//! causes the next one to be skipped.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use sha2::{Digest, Sha256};

use crate::config::SettingsDocument;
use crate::error::{Error, Result};

/// Everything that influences the artifacts of a run.
#[derive(Debug, Clone)]
pub struct FingerprintInputs<'a> {
    pub project_dir: &'a Path,
    pub infoplist_file: &'a Path,
    pub configuration: &'a str,
    pub environment: &'a str,
    pub target: &'a str,
    /// Emission options that change the set of artifacts, e.g. `objc`.
    pub options: &'a [&'a str],
    pub document: &'a SettingsDocument,
}

/// Hex-encoded digest of a run's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest of the run parameters followed by the digest of the document.
    pub fn compute(inputs: &FingerprintInputs<'_>) -> Result<Self> {
        let mut parameters = format!(
            "{} {} {} {} {}",
            inputs.project_dir.display(),
            inputs.infoplist_file.display(),
            inputs.configuration,
            inputs.environment,
            inputs.target
        );
        for option in inputs.options {
            parameters.push(' ');
            parameters.push_str(option);
        }

        let document = inputs.document.canonical_string()?;
        Ok(Self(format!("{}{}", sha256_hex(parameters.as_bytes()), sha256_hex(document.as_bytes()))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Persists the fingerprint of the last successful run in a single file.
#[derive(Debug, Clone)]
pub struct FingerprintGate {
    path: PathBuf,
}

impl FingerprintGate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `fingerprint` matches the stored one.
    ///
    /// A missing or unreadable file never skips.
    pub fn should_skip(&self, fingerprint: &Fingerprint) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(stored) => stored == fingerprint.as_str(),
            Err(e) => {
                debug!("No previous fingerprint at {}: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Store `fingerprint`, replacing the previous one atomically.
    pub fn commit(&self, fingerprint: &Fingerprint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", parent.display(), e),
            })?;
        }
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, fingerprint.as_str()).map_err(|e| Error::Filesystem {
            message: format!("Failed to write fingerprint '{}': {}", staging.display(), e),
        })?;
        fs::rename(&staging, &self.path).map_err(|e| Error::Filesystem {
            message: format!("Failed to store fingerprint '{}': {}", self.path.display(), e),
        })?;
        Ok(())
    }
}
