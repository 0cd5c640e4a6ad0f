//! Apply command implementation
//!
//! The apply command runs the whole pipeline for one environment,
//! configuration and target:
//! 1. Load and validate the inputs
//! 2. Skip when nothing changed since the last run
//! 3. Resolve the settings document
//! 4. Emit the artifacts
//! 5. Commit the fingerprint

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use natrium::assets::ImageMagick;
use natrium::context::RunOptions;
use natrium::output::{emoji, OutputConfig};
use natrium::phases::{orchestrator, RunOutcome};
use natrium::project::XcodeProject;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Directory containing the .xcodeproj and build-config.yml
    #[arg(short, long, value_name = "DIR", env = "NATRIUM_PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Info.plist path, relative to the project directory
    #[arg(short, long, value_name = "PATH", env = "NATRIUM_INFOPLIST_FILE")]
    pub infoplist_file: PathBuf,

    /// Active build configuration
    #[arg(short, long, value_name = "NAME", env = "NATRIUM_CONFIGURATION")]
    pub configuration: String,

    /// Active environment
    #[arg(short, long, value_name = "NAME", env = "NATRIUM_ENVIRONMENT")]
    pub environment: String,

    /// Target whose target_specific overrides apply
    #[arg(short, long, value_name = "NAME", env = "NATRIUM_TARGET")]
    pub target: String,

    /// Settings document (defaults to <project-dir>/build-config.yml)
    #[arg(long, value_name = "PATH", env = "NATRIUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory (defaults to <project-dir>/Natrium)
    #[arg(long, value_name = "DIR", env = "NATRIUM_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also generate NatriumConfig.h and NatriumConfig.m
    #[arg(long, env = "NATRIUM_OBJC")]
    pub objc: bool,

    /// Regenerate even if nothing changed
    #[arg(short, long, env = "NATRIUM_FORCE")]
    pub force: bool,

    /// Print the resolved values as JSON without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors and warnings
    #[arg(short, long, env = "NATRIUM_QUIET")]
    pub quiet: bool,
}

impl ApplyArgs {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            project_dir: self.project_dir.clone(),
            infoplist_file: self.infoplist_file.clone(),
            configuration: self.configuration.clone(),
            environment: self.environment.clone(),
            target: self.target.clone(),
            settings_file: self.config.clone(),
            output_dir: self.output_dir.clone(),
            objc: self.objc,
            force: self.force,
            dry_run: self.dry_run,
        }
    }
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let options = args.run_options();

    let project = XcodeProject::discover(&options.project_dir)?;
    let outcome = orchestrator::execute(&options, &project, &ImageMagick::default())?;

    match outcome {
        RunOutcome::DryRun { resolved } => {
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        RunOutcome::Unchanged => {
            if !args.quiet {
                println!(
                    "{} Nothing changed for {} / {}",
                    emoji(&out, "✅", "[OK]"),
                    options.environment,
                    options.configuration
                );
            }
        }
        RunOutcome::Completed { written, log } => {
            if args.quiet {
                return Ok(());
            }
            // A warning suppresses the summary.
            let Some(summary) = log.summary() else {
                return Ok(());
            };
            println!(
                "{} Applied {} / {} ({} files written)",
                emoji(&out, "✅", "[OK]"),
                options.environment,
                options.configuration,
                written.len()
            );
            for line in summary {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
