//! Orchestrator for a complete run
//!
//! Coordinates the phases in order, stopping early when the fingerprint
//! shows nothing changed or when a dry run was requested.

use log::{debug, info};

use super::{emission, load, resolution, RunOutcome};
use crate::assets::IconRibbon;
use crate::context::RunOptions;
use crate::defaults;
use crate::emit;
use crate::error::Result;
use crate::fingerprint::{Fingerprint, FingerprintGate, FingerprintInputs};
use crate::output::RunLog;
use crate::project::ProjectDescriptor;

/// Execute a complete run.
///
/// 1. Load and validate the inputs
/// 2. Compare the fingerprint with the previous run (unless forced)
/// 3. Resolve the document for the active environment, configuration and
///    target
/// 4. Emit all artifacts (skipped in a dry run)
/// 5. Commit the fingerprint
pub fn execute(
    options: &RunOptions,
    project: &dyn ProjectDescriptor,
    ribbon: &dyn IconRibbon,
) -> Result<RunOutcome> {
    // Load
    let load::Loaded { document, context } = load::execute(options, project)?;

    // Fingerprint check
    let emit_options: Vec<&str> = if options.objc { vec!["objc"] } else { Vec::new() };
    let fingerprint = Fingerprint::compute(&FingerprintInputs {
        project_dir: &context.project_dir,
        infoplist_file: &context.infoplist_file,
        configuration: &context.configuration,
        environment: &context.environment,
        target: &context.target,
        options: &emit_options,
        document: &document,
    })?;
    let gate = FingerprintGate::new(context.output_dir.join(defaults::FINGERPRINT_FILE));
    if !options.force && !options.dry_run && gate.should_skip(&fingerprint) {
        info!("Nothing changed since the last run");
        return Ok(RunOutcome::Unchanged);
    }

    // Resolution
    let resolution::Resolution { resolved, variables } =
        resolution::execute(&document, &context.selector(), Some(&context.target))?;
    debug!("Resolved with {} substitution variable(s)", variables.len());
    if options.dry_run {
        return Ok(RunOutcome::DryRun { resolved });
    }

    // Emission
    let mut run_log = RunLog::new();
    let emitters = emit::emitters(options.objc);
    let written = emission::execute(&context, &resolved, &emitters, ribbon, &mut run_log)?;
    for line in resolved.summary_lines() {
        run_log.record(line);
    }

    // Commit
    gate.commit(&fingerprint)?;

    Ok(RunOutcome::Completed {
        written,
        log: run_log,
    })
}
