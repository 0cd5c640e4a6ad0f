//! # Error Handling
//!
//! This module defines the centralized error type for `natrium`. It uses the
//! `thiserror` library to build an `Error` enum covering every anticipated
//! failure, each with a message that can be shown to the user as-is.
//!
//! ## Severity
//!
//! A run knows two severities:
//!
//! - **Fatal** errors abort the run. No fingerprint is committed and artifacts
//!   written by emitters that already finished stay on disk.
//! - **Warnings** are reported once per run and the run continues.
//!
//! [`Error::is_fatal`] decides which is which. Emitter failures and failures
//! of optional external tools are warnings; everything else is fatal.

use thiserror::Error;

/// Main error type for natrium operations
#[derive(Error, Debug)]
pub enum Error {
    /// The settings document could not be parsed or has an invalid shape.
    #[error("Error parsing settings document: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the document
        hint: Option<String>,
    },

    /// The requested environment is not declared under `environments`.
    #[error("Invalid environment ({environment})\nAvailable environments: {}", available.join(", "))]
    InvalidEnvironment {
        environment: String,
        available: Vec<String>,
    },

    /// The requested build configuration does not exist for the target.
    #[error("Invalid configuration ({configuration})\nAvailable configurations: {}", available.join(", "))]
    InvalidConfiguration {
        configuration: String,
        available: Vec<String>,
    },

    /// The requested target does not exist in the project descriptor.
    #[error("Cannot find target '{target}' in {project}")]
    TargetNotFound { target: String, project: String },

    /// The project descriptor declares no build configurations.
    #[error("No build configurations found for project '{project}'")]
    NoConfigurations { project: String },

    /// No project descriptor was found in the project directory.
    #[error("Cannot find xcodeproj in folder '{dir}'")]
    ProjectNotFound { dir: String },

    /// The project descriptor exists but could not be read.
    #[error("Cannot read project '{project}': {message}")]
    Project { project: String, message: String },

    /// A file referenced by the run or by the settings document is missing.
    #[error("Cannot find file '{path}'")]
    FileNotFound { path: String },

    /// A custom variable uses one of the reserved names.
    #[error("Cannot use '{name}' as a variable name. Reserved.")]
    ReservedVariable { name: String },

    /// An emitter failed to render its artifact.
    #[error("{emitter} emitter failed: {message}")]
    Emit { emitter: String, message: String },

    /// An optional external tool is missing or failed.
    #[error("{tool}: {message}")]
    Tool { tool: String, message: String },

    /// Writing or removing a file on disk failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A language version parsing error, wrapped from `semver::Error`.
    #[error("Version parsing error: {0}")]
    Semver(#[from] semver::Error),

    /// A property list error, wrapped from `plist::Error`.
    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),
}

impl Error {
    /// Whether this error aborts the run.
    ///
    /// Non-fatal errors are reported as a warning and the run continues
    /// with the next step.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Emit { .. } | Error::Tool { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
