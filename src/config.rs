//! # Settings Document
//!
//! This module loads the `build-config.yml` settings document. The document is
//! a YAML mapping from category name to an arbitrary subtree:
//!
//! ```yaml
//! environments:
//!   - Staging
//!   - Production
//!
//! natrium_variables:
//!   host:
//!     Staging: staging.example.com
//!     Production: example.com
//!
//! xcconfig:
//!   API_URL: https://${host}
//!
//! variables:
//!   apiKey:
//!     Staging,Production:
//!       Debug: debug-key
//!       Release: release-key
//!
//! target_specific:
//!   Widget:
//!     infoplist:
//!       CFBundleDisplayName: Widget
//! ```
//!
//! The document is parsed once per run into an order-preserving mapping and
//! never modified afterwards. What each category means is described by
//! [`Category`]; how items are matched against the active environment and
//! configuration lives in [`crate::resolve`].

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value as YamlValue};
use std::fs;
use std::path::Path;

/// The role of a top-level category in the settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// The declared environment names.
    Environments,
    /// Substitution variables, collected in the variables-only pass.
    NatriumVariables,
    /// Custom variables emitted as source constants.
    Variables,
    /// Build settings written to xcconfig files.
    BuildSettings,
    /// Entries for the Info.plist given on the command line.
    InfoPlist,
    /// Entries for a named `.plist` or `.entitlements` file.
    PlistFile(String),
    /// App icon ribbon settings.
    AppIcon,
    /// Files to copy, destination → source.
    Files,
    /// Per-target overrides.
    TargetSpecific,
    /// Anything else; resolved and reported but not consumed.
    Other(String),
}

impl Category {
    pub const ENVIRONMENTS: &'static str = "environments";
    pub const NATRIUM_VARIABLES: &'static str = "natrium_variables";
    pub const VARIABLES: &'static str = "variables";
    pub const XCCONFIG: &'static str = "xcconfig";
    pub const INFOPLIST: &'static str = "infoplist";
    pub const APPICON: &'static str = "appicon";
    pub const FILES: &'static str = "files";
    pub const TARGET_SPECIFIC: &'static str = "target_specific";

    pub fn from_name(name: &str) -> Self {
        match name {
            Self::ENVIRONMENTS => Category::Environments,
            Self::NATRIUM_VARIABLES => Category::NatriumVariables,
            Self::VARIABLES => Category::Variables,
            Self::XCCONFIG => Category::BuildSettings,
            Self::INFOPLIST => Category::InfoPlist,
            Self::APPICON => Category::AppIcon,
            Self::FILES => Category::Files,
            Self::TARGET_SPECIFIC => Category::TargetSpecific,
            other if other.ends_with(".plist") || other.ends_with(".entitlements") => {
                Category::PlistFile(other.to_string())
            }
            other => Category::Other(other.to_string()),
        }
    }

    /// Whether entries of this category end up in a property-list file.
    pub fn is_plist(&self) -> bool {
        matches!(self, Category::InfoPlist | Category::PlistFile(_))
    }
}

/// Render a mapping key as a string.
///
/// Keys are usually strings, but YAML happily produces numbers or booleans
/// for keys such as `1` or `yes`. Other key types yield `None`.
pub fn key_string(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Tagged(tagged) => key_string(&tagged.value),
        _ => None,
    }
}

/// The parsed settings document.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDocument {
    root: Mapping,
}

impl SettingsDocument {
    /// Parse a settings document from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        let value: YamlValue = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: None,
        })?;
        match value {
            YamlValue::Mapping(root) => Ok(Self { root }),
            YamlValue::Null => Err(Error::ConfigParse {
                message: "document is empty".to_string(),
                hint: Some("Declare at least an 'environments:' list".to_string()),
            }),
            _ => Err(Error::ConfigParse {
                message: "top level must be a mapping of categories".to_string(),
                hint: None,
            }),
        }
    }

    /// Load and parse a settings document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            Error::ConfigParse { message, hint } => Error::ConfigParse {
                message: format!("{}: {}", path.display(), message),
                hint,
            },
            other => other,
        })
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Categories in document order, skipping keys that are not strings.
    pub fn categories(&self) -> impl Iterator<Item = (String, &YamlValue)> {
        self.root
            .iter()
            .filter_map(|(k, v)| key_string(k).map(|name| (name, v)))
    }

    /// The declared environments, in document order.
    pub fn environments(&self) -> Result<Vec<String>> {
        let hint = Some("Add a list such as 'environments: [Staging, Production]'".to_string());
        let Some(node) = self.root.get(Category::ENVIRONMENTS) else {
            return Err(Error::ConfigParse {
                message: "missing 'environments'".to_string(),
                hint,
            });
        };
        let Some(items) = node.as_sequence() else {
            return Err(Error::ConfigParse {
                message: "'environments' must be a list".to_string(),
                hint,
            });
        };
        let environments: Vec<String> = items.iter().filter_map(key_string).collect();
        if environments.is_empty() {
            return Err(Error::ConfigParse {
                message: "'environments' is empty".to_string(),
                hint,
            });
        }
        Ok(environments)
    }

    /// Check that `environment` is one of the declared environments.
    pub fn validate_environment(&self, environment: &str) -> Result<Vec<String>> {
        let environments = self.environments()?;
        if !environments.iter().any(|e| e == environment) {
            return Err(Error::InvalidEnvironment {
                environment: environment.to_string(),
                available: environments,
            });
        }
        Ok(environments)
    }

    /// The `target_specific` subtree for `target`, if any.
    pub fn target_subtree(&self, target: &str) -> Option<&Mapping> {
        self.root
            .get(Category::TARGET_SPECIFIC)
            .and_then(YamlValue::as_mapping)
            .and_then(|targets| targets.get(target))
            .and_then(YamlValue::as_mapping)
    }

    /// Canonical text form of the parsed document, used for fingerprinting.
    ///
    /// Formatting and comments in the source file do not affect it.
    pub fn canonical_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }
}
