//! # Natrium Library
//!
//! Resolves a settings document describing values per environment and build
//! configuration into the artifacts an app build consumes: a Swift source
//! file (optionally an Objective-C header and implementation), xcconfig
//! build-settings files, and edits to property-list files.
//!
//! ## Quick Example
//!
//! ```
//! use natrium::config::SettingsDocument;
//! use natrium::phases::resolution;
//! use natrium::resolve::Selector;
//! use natrium::value::Value;
//!
//! let document = SettingsDocument::parse(r#"
//! environments: [Staging, Production]
//! natrium_variables:
//!   host:
//!     Staging: staging.example.com
//!     Production: example.com
//! variables:
//!   apiUrl: https://${host}
//! "#).unwrap();
//!
//! let resolution = resolution::execute(&document, &Selector::new("Staging", "Debug"), None).unwrap();
//! assert_eq!(
//!     resolution.resolved.get("variables", "apiUrl"),
//!     Some(&Value::from("https://staging.example.com"))
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Settings document (`config`)**: categories of items, each item keyed by
//!   environment label sets and optionally by configuration label sets.
//! - **Resolution (`resolve`, `variables`, `resolved`)**: picks one value per
//!   item for the active environment and configuration, and substitutes
//!   `${name}` references to collected variables.
//! - **Emitters (`emit`)**: render the resolved map into artifacts staged in an
//!   in-memory filesystem (`filesystem`).
//! - **Fingerprint (`fingerprint`)**: skips runs whose inputs did not change.
//! - **Phases (`phases`)**: load, fingerprint check, resolution, emission and
//!   commit, coordinated by `phases::orchestrator`.
//!
//! The project descriptor (`project`), file copies and the icon ribbon
//! (`assets`) are collaborators behind small traits.

pub mod assets;
pub mod config;
pub mod context;
pub mod defaults;
pub mod emit;
pub mod error;
pub mod filesystem;
pub mod fingerprint;
pub mod output;
pub mod phases;
pub mod project;
pub mod resolve;
pub mod resolved;
pub mod value;
pub mod variables;

#[cfg(test)]
mod resolve_proptest;
