//! `backup`: snapshot the home-side copies of every tracked dotfile.

use anyhow::Result;

use super::RunContext;
use crate::logging::Log;

/// Take a standalone timestamped backup of the tracked files.
///
/// # Errors
///
/// Returns an error if the tracked set cannot be enumerated or any file
/// failed to back up.
pub fn run(ctx: &RunContext, log: &dyn Log) -> Result<()> {
    log.stage("Dotfile Backup");

    let syncer = ctx.syncer(log);
    let (backup_dir, stats) = syncer.backup(true)?;
    log.info(&format!("Backup saved to {}", backup_dir.display()));
    super::finish(log, "backup", stats)
}
