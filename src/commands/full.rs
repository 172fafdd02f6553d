//! `run`: the full workstation setup pipeline.
//!
//! Order matters: back up the current home files first, then install
//! software, then deploy dotfiles, then finalize. A Homebrew failure skips
//! only the install phase; dotfile synchronization still runs.

use anyhow::Result;

use super::RunContext;
use super::menu::Confirm;
use crate::exec::Executor;
use crate::install::Installer;
use crate::logging::Log;
use crate::sync::SyncStats;

/// Run the full setup pipeline.
///
/// # Errors
///
/// Returns an error if the tracked set cannot be enumerated or any phase
/// recorded failures.
pub fn run(
    ctx: &RunContext,
    executor: &dyn Executor,
    log: &dyn Log,
    confirm: &dyn Confirm,
) -> Result<()> {
    log.stage("Workstation Setup");

    let syncer = ctx.syncer(log);
    let installer = Installer::new(&ctx.config.manifest, executor, log, &ctx.root, &ctx.home);

    log.stage("Dotfile Backup");
    let (_, mut totals) = syncer.backup(false)?;

    log.stage("Software Installation");
    let skipped_install = match installer.install_all() {
        Ok(stats) => {
            totals.succeeded += stats.succeeded;
            totals.failed += stats.failed;
            false
        }
        Err(e) => {
            log.failure(&format!("Skipping software installation: {e}"));
            totals.failed += 1;
            true
        }
    };

    log.stage("Dotfile Deployment");
    let (_, deploy_stats) = syncer.deploy()?;
    totals.succeeded += deploy_stats.succeeded;
    totals.failed += deploy_stats.failed;

    if !skipped_install {
        installer.finalize();
    }

    offer_backup_cleanup(&syncer, log, confirm, totals)?;
    super::finish(log, "setup", totals)
}

/// After a clean run, offer to delete the backups it created.
fn offer_backup_cleanup(
    syncer: &crate::sync::Syncer<'_>,
    log: &dyn Log,
    confirm: &dyn Confirm,
    totals: SyncStats,
) -> Result<()> {
    if totals.has_failures() {
        log.warn("Backups were kept because some steps failed.");
        return Ok(());
    }
    if confirm.confirm("Setup succeeded. Delete the backups taken during this run?") {
        syncer.clear()?;
        log.success("Backups cleared");
    } else {
        log.info(&format!(
            "Backups kept under {}",
            syncer.backup_root().display()
        ));
    }
    Ok(())
}
