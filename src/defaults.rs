//! Default values for natrium runs.
//!
//! This module provides centralized default file names and locations used
//! across commands, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// Name of the settings document inside the project directory.
pub const SETTINGS_FILE: &str = "build-config.yml";

/// Name of the output directory inside the project directory.
pub const OUTPUT_DIR: &str = "Natrium";

/// Name of the file storing the last run's fingerprint.
pub const FINGERPRINT_FILE: &str = ".natrium-fingerprint";

/// Generated Swift source.
pub const SWIFT_FILE: &str = "Config.swift";

/// Name of the generated Swift class.
pub const SWIFT_CLASS: &str = "Config";

/// Generated Objective-C header and implementation.
pub const OBJC_HEADER_FILE: &str = "NatriumConfig.h";
pub const OBJC_IMPLEMENTATION_FILE: &str = "NatriumConfig.m";

/// Base name of the generated build-settings files.
pub const XCCONFIG_BASENAME: &str = "ProjectEnvironment";

/// Returns the default settings document for a project.
///
/// This can be overridden by the `--config` CLI flag or the `NATRIUM_CONFIG`
/// environment variable.
pub fn default_settings_file(project_dir: &Path) -> PathBuf {
    project_dir.join(SETTINGS_FILE)
}

/// Returns the default output directory for a project.
///
/// This can be overridden by the `--output-dir` CLI flag or the
/// `NATRIUM_OUTPUT_DIR` environment variable.
pub fn default_output_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(OUTPUT_DIR)
}
