//! Run parameters and the immutable run context
//!
//! [`RunOptions`] is what the caller asks for. The load phase validates the
//! options against the settings document and the project descriptor and
//! produces a [`RunContext`], which is then passed by reference to every
//! later phase and emitter.

use std::path::{Path, PathBuf};

use crate::project::{Dialect, LanguageVersion};
use crate::resolve::Selector;

/// Parameters of a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory containing the `.xcodeproj` and the settings document.
    pub project_dir: PathBuf,
    /// Info.plist location, relative to `project_dir`.
    pub infoplist_file: PathBuf,
    /// Active build configuration.
    pub configuration: String,
    /// Active environment.
    pub environment: String,
    /// Target whose `target_specific` overrides apply.
    pub target: String,
    /// Settings document; defaults to `<project_dir>/build-config.yml`.
    pub settings_file: Option<PathBuf>,
    /// Output directory; defaults to `<project_dir>/Natrium`.
    pub output_dir: Option<PathBuf>,
    /// Also emit the Objective-C dialect.
    pub objc: bool,
    /// Ignore the stored fingerprint.
    pub force: bool,
    /// Resolve only; write nothing.
    pub dry_run: bool,
}

/// Validated, immutable state shared by all phases of a run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub project_dir: PathBuf,
    pub infoplist_file: PathBuf,
    pub environment: String,
    pub configuration: String,
    pub target: String,
    /// Declared environments, in document order.
    pub environments: Vec<String>,
    /// Build configurations of the target, in project order.
    pub configurations: Vec<String>,
    pub language_version: LanguageVersion,
    pub output_dir: PathBuf,
}

impl RunContext {
    pub fn selector(&self) -> Selector<'_> {
        Selector::new(&self.environment, &self.configuration)
    }

    pub fn dialect(&self) -> Dialect {
        self.language_version.dialect()
    }

    /// Resolve a path given relative to the project directory.
    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir.join(relative)
    }

    pub fn infoplist_path(&self) -> PathBuf {
        self.project_path(&self.infoplist_file)
    }
}
