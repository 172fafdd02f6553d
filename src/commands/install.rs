//! `install`: install and upgrade the configured applications.

use anyhow::Result;

use super::RunContext;
use crate::exec::Executor;
use crate::install::Installer;
use crate::logging::Log;

/// Run the software install phase on its own.
///
/// # Errors
///
/// Returns an error if Homebrew is unavailable or any item failed to
/// install.
pub fn run(ctx: &RunContext, executor: &dyn Executor, log: &dyn Log) -> Result<()> {
    log.stage("Software Installation");

    let installer = Installer::new(&ctx.config.manifest, executor, log, &ctx.root, &ctx.home);
    let stats = installer.install_all()?;
    super::finish(log, "install", stats)
}
