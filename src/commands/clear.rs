//! `clear`: delete all backup snapshots.

use anyhow::Result;

use super::RunContext;
use super::menu::Confirm;
use crate::logging::Log;
use crate::sync::ClearOutcome;

/// Delete the backup tree after confirmation. An absent tree is a benign
/// no-op and skips the prompt.
///
/// # Errors
///
/// Returns an error if the backup tree exists but cannot be removed.
pub fn run(ctx: &RunContext, log: &dyn Log, confirm: &dyn Confirm) -> Result<()> {
    log.stage("Clear Backups");

    let syncer = ctx.syncer(log);
    if !syncer.backup_root().exists() {
        log.info("No backups found. Nothing to clear.");
        return Ok(());
    }

    if !confirm.confirm("Delete all backups? This cannot be undone.") {
        log.info("Backups kept.");
        return Ok(());
    }

    match syncer.clear()? {
        ClearOutcome::Cleared => log.success("All backups cleared"),
        ClearOutcome::NothingToClear => log.info("No backups found. Nothing to clear."),
    }
    Ok(())
}
