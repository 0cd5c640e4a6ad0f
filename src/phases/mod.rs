//! The phases of a natrium run.
//!
//! ## Overview
//!
//! A run moves through these phases, in order:
//!
//! 1. Load - read the settings document and the project descriptor, and
//!    validate the requested environment, target and configuration
//! 2. Fingerprint check - stop early when nothing changed since the last
//!    successful run
//! 3. Resolution - collect substitution variables, resolve every category,
//!    then overlay the target's `target_specific` subtree
//! 4. Emission - copy files, run every emitter and write its artifacts,
//!    generate the icon set
//! 5. Commit - store the fingerprint
//!
//! Any fatal error aborts the run without committing. Artifacts written by
//! emitters that already finished stay on disk.

use std::path::PathBuf;

use crate::output::RunLog;
use crate::resolved::ResolvedMap;

pub mod emission;
pub mod load;
pub mod orchestrator;
pub mod resolution;
pub mod write;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The fingerprint matched the previous run; nothing was written.
    Unchanged,
    /// Resolution only; nothing was written.
    DryRun { resolved: ResolvedMap },
    /// Artifacts were emitted and the fingerprint committed.
    Completed {
        written: Vec<PathBuf>,
        log: RunLog,
    },
}

impl RunOutcome {
    /// Files written by the run, in writing order.
    pub fn written(&self) -> &[PathBuf] {
        match self {
            RunOutcome::Completed { written, .. } => written,
            _ => &[],
        }
    }
}
