//! `capture`: pull custom sections from home files back into the
//! repository.

use std::path::PathBuf;

use anyhow::Result;

use super::RunContext;
use crate::logging::Log;

/// Capture the custom sections of the given home files (all tracked files
/// when `paths` is empty) into the repository copies.
///
/// # Errors
///
/// Returns an error if the tracked set cannot be enumerated or any file
/// failed to capture.
pub fn run(ctx: &RunContext, log: &dyn Log, paths: &[PathBuf]) -> Result<()> {
    log.stage("Dotfile Capture");

    let syncer = ctx.syncer(log);
    let stats = syncer.capture(paths)?;
    super::finish(log, "capture", stats)
}
