//! # Override Resolution
//!
//! Picks, for every item of the settings document, the one value that applies
//! to the active environment and build configuration.
//!
//! An item is either a plain scalar, taken as-is, or a mapping whose keys are
//! environment label sets. An environment entry is again either a scalar
//! (valid for every configuration of that environment) or a mapping whose keys
//! are configuration label sets. Label sets are comma-separated lists matched
//! by exact membership:
//!
//! ```yaml
//! apiKey:
//!   Staging: staging-key            # single-level entry
//!   Staging,Production:
//!     Debug: debug-key              # two-level entry
//!     Release: release-key
//! ```
//!
//! Precedence:
//!
//! - A matching two-level entry (environment, then configuration) beats a
//!   matching single-level entry.
//! - Within a level the first matching entry in document order wins.
//! - An item with no matching entry is omitted; that is not an error.
//!
//! Build settings (`xcconfig`) follow the same rules but are partitioned by
//! configuration instead of being narrowed to the active one: every
//! configuration label of a matching two-level entry gets its own bucket, and
//! the `*` label (accepted at both levels, for build settings only) selects
//! the wildcard bucket.
//!
//! Resolution runs in two passes over the same document. The variables-only
//! pass ([`Pass::CollectVariables`]) records `natrium_variables` into a
//! [`VariableStore`]; the full pass ([`Pass::Full`]) resolves every other
//! category and substitutes `${name}` references in chosen strings. Running
//! the collection first makes every variable known before any substitution,
//! whatever the category order in the file.

use log::debug;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::config::{key_string, Category};
use crate::error::{Error, Result};
use crate::resolved::{BuildSettings, ResolvedMap, WILDCARD};
use crate::value::Value;
use crate::variables::VariableStore;

/// Variable names that are always generated and cannot be redeclared.
pub const RESERVED_VARIABLE_NAMES: [&str; 2] = ["environment", "configuration"];

/// Whether `name` can be used verbatim as a generated constant name:
/// ASCII letters, digits and `_`, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Which part of the document a resolution pass handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Only collect `natrium_variables` into the variable store.
    CollectVariables,
    /// Resolve every category except `natrium_variables`.
    Full,
}

/// The active environment and build configuration.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    pub environment: &'a str,
    pub configuration: &'a str,
}

impl<'a> Selector<'a> {
    pub fn new(environment: &'a str, configuration: &'a str) -> Self {
        Self {
            environment,
            configuration,
        }
    }
}

/// Whether the comma-separated label set in `key` contains `wanted`.
///
/// With `wildcard`, the `*` label matches anything.
pub fn labels_contain(key: &YamlValue, wanted: &str, wildcard: bool) -> bool {
    key_string(key).is_some_and(|labels| {
        labels
            .split(',')
            .map(str::trim)
            .any(|label| label == wanted || (wildcard && label == WILDCARD))
    })
}

/// Select the node that applies to `selector`, or `None` if the item has no
/// matching entry.
pub fn select<'d>(item: &'d YamlValue, selector: &Selector<'_>) -> Option<&'d YamlValue> {
    let YamlValue::Mapping(environments) = item else {
        return Some(item);
    };

    let mut single_level = None;
    for (env_key, env_node) in environments {
        if !labels_contain(env_key, selector.environment, false) {
            continue;
        }
        match env_node {
            YamlValue::Mapping(configurations) => {
                let matched = configurations
                    .iter()
                    .find(|(config_key, _)| labels_contain(config_key, selector.configuration, false));
                if let Some((_, node)) = matched {
                    return Some(node);
                }
            }
            node => {
                if single_level.is_none() {
                    single_level = Some(node);
                }
            }
        }
    }
    single_level
}

/// Select the build-setting nodes that apply to `environment`, one per bucket.
///
/// Single-level entries go to the wildcard bucket. Two-level entries fan out
/// to one bucket per configuration label (`*` meaning the wildcard bucket).
/// The first entry to claim a bucket keeps it.
pub fn select_build_settings<'d>(
    item: &'d YamlValue,
    environment: &str,
) -> Vec<(String, &'d YamlValue)> {
    let YamlValue::Mapping(environments) = item else {
        return vec![(WILDCARD.to_string(), item)];
    };

    let mut selected: Vec<(String, &YamlValue)> = Vec::new();
    let mut claim = |bucket: &str, node: &'d YamlValue| {
        if !selected.iter().any(|(b, _)| b == bucket) {
            selected.push((bucket.to_string(), node));
        }
    };

    let mut single_level = None;
    for (env_key, env_node) in environments {
        if !labels_contain(env_key, environment, true) {
            continue;
        }
        match env_node {
            YamlValue::Mapping(configurations) => {
                for (config_key, node) in configurations {
                    let Some(labels) = key_string(config_key) else {
                        continue;
                    };
                    for label in labels.split(',').map(str::trim) {
                        claim(label, node);
                    }
                }
            }
            node => {
                if single_level.is_none() {
                    single_level = Some(node);
                }
            }
        }
    }

    // A two-level `*` entry is more specific than an environment-only one.
    if let Some(node) = single_level {
        claim(WILDCARD, node);
    }
    selected
}

/// Run one resolution pass over `document`.
///
/// `document` is either the whole settings document or one
/// `target_specific` subtree. In [`Pass::CollectVariables`] the returned map
/// is empty and `variables` is filled; in [`Pass::Full`] `variables` is only
/// read.
pub fn resolve(
    document: &Mapping,
    selector: &Selector<'_>,
    variables: &mut VariableStore,
    pass: Pass,
) -> Result<ResolvedMap> {
    let mut resolved = ResolvedMap::new();

    for (key, subtree) in document {
        let Some(name) = key_string(key) else {
            continue;
        };
        let category = Category::from_name(&name);

        match (&category, pass) {
            (Category::Environments | Category::TargetSpecific, _) => {}
            (Category::NatriumVariables, Pass::CollectVariables) => {
                collect_variables(subtree, selector, variables);
            }
            (_, Pass::CollectVariables) | (Category::NatriumVariables, Pass::Full) => {}
            (Category::BuildSettings, Pass::Full) => {
                resolve_build_settings(subtree, selector, variables, resolved.build_settings_mut());
            }
            (_, Pass::Full) => {
                resolve_category(&name, &category, subtree, selector, variables, &mut resolved)?;
            }
        }
    }

    Ok(resolved)
}

fn items<'a>(
    category: &str,
    subtree: &'a YamlValue,
) -> Option<impl Iterator<Item = (String, &'a YamlValue)> + 'a> {
    let Some(mapping) = subtree.as_mapping() else {
        debug!("Skipping category '{}': not a mapping", category);
        return None;
    };
    Some(
        mapping
            .iter()
            .filter_map(|(k, v)| key_string(k).map(|name| (name, v))),
    )
}

fn scalar(category: &str, item: &str, node: &YamlValue) -> Option<Value> {
    let value = Value::from_yaml(node);
    if value.is_none() {
        debug!("Skipping [{}] {}: value is not a scalar", category, item);
    }
    value
}

fn collect_variables(subtree: &YamlValue, selector: &Selector<'_>, variables: &mut VariableStore) {
    let Some(items) = items(Category::NATRIUM_VARIABLES, subtree) else {
        return;
    };
    for (name, item) in items {
        let Some(node) = select(item, selector) else {
            continue;
        };
        if let Some(value) = scalar(Category::NATRIUM_VARIABLES, &name, node) {
            variables.insert(name, value);
        }
    }
}

fn resolve_category(
    name: &str,
    category: &Category,
    subtree: &YamlValue,
    selector: &Selector<'_>,
    variables: &VariableStore,
    resolved: &mut ResolvedMap,
) -> Result<()> {
    let Some(items) = items(name, subtree) else {
        return Ok(());
    };
    for (key, item) in items {
        let is_variable = *category == Category::Variables;
        if is_variable {
            check_variable_name(&key)?;
        }
        let Some(node) = select(item, selector) else {
            debug!("No entry for [{}] {} in {}/{}", name, key, selector.environment, selector.configuration);
            continue;
        };
        if let Some(value) = scalar(name, &key, node) {
            if is_variable && matches!(value, Value::Float(x) if !x.is_finite()) {
                return Err(Error::ConfigParse {
                    message: format!("variable '{}' is not a finite number ({})", key, value),
                    hint: None,
                });
            }
            resolved.insert(name, key, variables.substitute_value(value));
        }
    }
    Ok(())
}

fn check_variable_name(name: &str) -> Result<()> {
    if RESERVED_VARIABLE_NAMES.contains(&name) {
        return Err(Error::ReservedVariable {
            name: name.to_string(),
        });
    }
    if !is_identifier(name) {
        return Err(Error::ConfigParse {
            message: format!("'{}' is not a valid variable name", name),
            hint: Some("Use ASCII letters, digits and '_', not starting with a digit".to_string()),
        });
    }
    Ok(())
}

fn resolve_build_settings(
    subtree: &YamlValue,
    selector: &Selector<'_>,
    variables: &VariableStore,
    settings: &mut BuildSettings,
) {
    let Some(items) = items(Category::XCCONFIG, subtree) else {
        return;
    };
    for (key, item) in items {
        for (bucket, node) in select_build_settings(item, selector.environment) {
            if let Some(value) = scalar(Category::XCCONFIG, &key, node) {
                settings.set(&bucket, key.clone(), variables.substitute(&value.to_string()));
            }
        }
    }
}
