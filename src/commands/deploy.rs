//! `deploy`: merge tracked dotfiles into the home directory.

use anyhow::Result;

use super::RunContext;
use crate::logging::Log;

/// Deploy every tracked dotfile, backing up pre-deploy copies first.
///
/// # Errors
///
/// Returns an error if the tracked set cannot be enumerated or any file
/// failed to deploy.
pub fn run(ctx: &RunContext, log: &dyn Log) -> Result<()> {
    log.stage("Dotfile Deployment");

    let syncer = ctx.syncer(log);
    let (backup_dir, stats) = syncer.deploy()?;
    log.info(&format!(
        "Pre-deploy copies saved to {}",
        backup_dir.display()
    ));
    super::finish(log, "deploy", stats)
}
