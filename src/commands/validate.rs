//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a settings
//! document without touching the project.
//!
//! ## Functionality
//!
//! - **Parsing**: the document must parse and declare its environments.
//! - **Reserved names**: custom variables may not be called `environment`
//!   or `configuration`.
//! - **Resolution**: every declared environment is resolved for the given
//!   configuration, and the number of resolved entries is reported.
//!
//! This command is a read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use natrium::config::{key_string, Category, SettingsDocument};
use natrium::defaults;
use natrium::output::{emoji, OutputConfig};
use natrium::phases::resolution;
use natrium::resolve::{Selector, RESERVED_VARIABLE_NAMES};

/// Validate a build-config.yml settings document
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the settings document to validate.
    #[arg(long, value_name = "FILE", default_value = defaults::SETTINGS_FILE, env = "NATRIUM_CONFIG")]
    pub config: PathBuf,

    /// Build configuration to resolve every environment with.
    #[arg(short, long, value_name = "NAME", default_value = "Debug")]
    pub configuration: String,

    /// Also apply the target_specific overrides of this target.
    #[arg(short, long, value_name = "NAME")]
    pub target: Option<String>,
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating settings: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.config.display()
    );

    let document = SettingsDocument::from_file(&args.config)?;
    let environments = document.environments()?;
    println!("{} Settings document parsed successfully", emoji(&out, "✅", "[OK]"));
    println!("   Environments: {}", environments.join(", "));

    let mut has_errors = false;

    let reserved = reserved_variables(&document);
    for name in &reserved {
        println!(
            "{} Cannot use '{}' as a variable name. Reserved.",
            emoji(&out, "❌", "[ERR]"),
            name
        );
        has_errors = true;
    }

    if reserved.is_empty() {
        println!(
            "\n{} Resolving for configuration '{}':",
            emoji(&out, "📊", "[INFO]"),
            args.configuration
        );
        for environment in &environments {
            let selector = Selector::new(environment, &args.configuration);
            match resolution::execute(&document, &selector, args.target.as_deref()) {
                Ok(resolution) => {
                    println!(
                        "   {}: {} entries, {} variables",
                        environment,
                        resolution.resolved.summary_lines().len(),
                        resolution.variables.len()
                    );
                }
                Err(e) => {
                    println!("{} {}: {}", emoji(&out, "❌", "[ERR]"), environment, e);
                    has_errors = true;
                }
            }
        }
    }

    if has_errors {
        anyhow::bail!("Validation failed");
    }
    println!("\n{} Settings document is valid", emoji(&out, "✅", "[OK]"));
    Ok(())
}

/// Custom variables using a reserved name, in document order.
fn reserved_variables(document: &SettingsDocument) -> Vec<String> {
    document
        .root()
        .get(Category::VARIABLES)
        .and_then(|v| v.as_mapping())
        .into_iter()
        .flat_map(|m| m.keys())
        .filter_map(key_string)
        .filter(|name| RESERVED_VARIABLE_NAMES.contains(&name.as_str()))
        .collect()
}
