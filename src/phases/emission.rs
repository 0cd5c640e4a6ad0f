//! Emission phase
//!
//! Turns the resolved map into artifacts on disk:
//!
//! 1. **Preflight**: every file referenced by `files` and `appicon` must
//!    exist. A missing one aborts the run before anything is written.
//! 2. **File copies**: `files` entries are copied into the project.
//! 3. **Emitters**: each emitter stages its artifacts, stale artifacts are
//!    removed, and the staged files are written. A fatal emitter error
//!    aborts the run; a non-fatal one is reported as a warning and the next
//!    emitter runs.
//! 4. **Icon ribbon**: the app icon set is generated last.

use std::path::PathBuf;

use log::info;

use super::write;
use crate::assets::{self, IconRequest, IconRibbon};
use crate::context::RunContext;
use crate::emit::Emitter;
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::output::RunLog;
use crate::resolved::ResolvedMap;

/// Execute the emission phase. Returns the written paths.
pub fn execute(
    ctx: &RunContext,
    resolved: &ResolvedMap,
    emitters: &[Box<dyn Emitter>],
    ribbon: &dyn IconRibbon,
    run_log: &mut RunLog,
) -> Result<Vec<PathBuf>> {
    assets::check_sources(&assets::referenced_sources(ctx, resolved))?;

    let mut written = Vec::new();

    let mut copies = MemoryFS::new();
    assets::stage_copies(&assets::file_copies(ctx, resolved), &mut copies)?;
    written.extend(write::execute(&copies, &ctx.output_dir)?);

    for emitter in emitters {
        let mut staged = MemoryFS::new();
        if let Err(e) = emitter.emit(ctx, resolved, &mut staged) {
            report(e, run_log)?;
            continue;
        }
        write::remove_stale(&ctx.output_dir, &emitter.stale_patterns())?;
        let files = write::execute(&staged, &ctx.output_dir)?;
        info!("{} emitter wrote {} file(s)", emitter.name(), files.len());
        written.extend(files);
    }

    if let Some(request) = IconRequest::from_resolved(ctx, resolved) {
        let mut staged = MemoryFS::new();
        match ribbon.generate(&request, &mut staged) {
            Ok(()) => written.extend(write::execute(&staged, &ctx.output_dir)?),
            Err(e) => report(e, run_log)?,
        }
    }

    Ok(written)
}

/// Propagate a fatal error; record anything else as a warning.
fn report(error: Error, run_log: &mut RunLog) -> Result<()> {
    if error.is_fatal() {
        return Err(error);
    }
    run_log.warning(error);
    Ok(())
}
