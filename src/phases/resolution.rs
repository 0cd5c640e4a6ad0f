//! Resolution phase
//!
//! Runs the resolution passes over the whole document, then again over the
//! `target_specific` subtree of the active target. Entries resolved from the
//! subtree overwrite the document-wide ones, and variables declared in the
//! subtree shadow document-wide variables while the subtree is resolved.

use log::debug;

use crate::config::SettingsDocument;
use crate::error::Result;
use crate::resolve::{resolve, Pass, Selector};
use crate::resolved::{ResolvedMap, WILDCARD};
use crate::variables::VariableStore;

/// Name of the build setting holding the active environment.
pub const ENVIRONMENT_SETTING: &str = "ENVIRONMENT";

/// The result of the resolution phase.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub resolved: ResolvedMap,
    pub variables: VariableStore,
}

/// Execute the resolution phase for `target` (if any).
pub fn execute(
    document: &SettingsDocument,
    selector: &Selector<'_>,
    target: Option<&str>,
) -> Result<Resolution> {
    let mut variables = VariableStore::new();
    resolve(document.root(), selector, &mut variables, Pass::CollectVariables)?;

    let mut resolved = ResolvedMap::new();
    resolved
        .build_settings_mut()
        .set(WILDCARD, ENVIRONMENT_SETTING, selector.environment);
    resolved.apply_overrides(resolve(document.root(), selector, &mut variables, Pass::Full)?);

    if let Some(subtree) = target.and_then(|t| document.target_subtree(t)) {
        debug!("Applying target_specific overrides for '{}'", target.unwrap_or_default());
        resolve(subtree, selector, &mut variables, Pass::CollectVariables)?;
        resolved.apply_overrides(resolve(subtree, selector, &mut variables, Pass::Full)?);
    }

    Ok(Resolution { resolved, variables })
}
