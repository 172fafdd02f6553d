//! Command entry points and shared run context.

pub mod backup;
pub mod capture;
pub mod clear;
pub mod deploy;
pub mod full;
pub mod install;
pub mod menu;

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Config;
use crate::exec::SystemExecutor;
use crate::install::hooks;
use crate::logging::Log;
use crate::markers::Markers;
use crate::sync::{SyncStats, Syncer};

use menu::{AssumeYes, Confirm, TerminalConfirm};

/// Environment variable overriding the repository root.
const ROOT_ENV: &str = "DOTSYNC_ROOT";

/// Resolved run context shared by every command.
#[derive(Debug)]
pub struct RunContext {
    /// Repository root (holds `dotfiles/`, `backups/`, `conf/`).
    pub root: PathBuf,
    /// Target home directory.
    pub home: PathBuf,
    /// Loaded configuration.
    pub config: Config,
}

impl RunContext {
    /// Resolve root, home, and configuration from flags and environment.
    ///
    /// Root: `--root`, then `DOTSYNC_ROOT`, then the current directory.
    /// Home: `--home`, then the platform home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined or the
    /// configuration fails to load.
    pub fn resolve(opts: &GlobalOpts) -> Result<Self> {
        let root = match &opts.root {
            Some(root) => root.clone(),
            None => match std::env::var_os(ROOT_ENV) {
                Some(root) => PathBuf::from(root),
                None => std::env::current_dir().context("cannot determine current directory")?,
            },
        };

        let home = match &opts.home {
            Some(home) => home.clone(),
            None => std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(PathBuf::from)
                .context("cannot determine home directory; pass --home")?,
        };

        let config = Config::load(&root, &hooks::names())?;
        Ok(Self { root, home, config })
    }

    /// Build a synchronizer for this context.
    #[must_use]
    pub fn syncer<'a>(&self, log: &'a dyn Log) -> Syncer<'a> {
        Syncer::new(
            &self.root,
            &self.home,
            Markers::for_owner(&self.config.manifest.owner),
            log,
        )
    }
}

/// Dispatch the parsed command line.
///
/// # Errors
///
/// Returns an error when the selected command fails; per-file failures
/// inside an operation surface here so the process exits non-zero.
pub fn dispatch(cli: &Cli, log: &dyn Log) -> Result<()> {
    let ctx = RunContext::resolve(&cli.global)?;
    let executor = SystemExecutor;
    let confirm: &dyn Confirm = if cli.global.yes {
        &AssumeYes
    } else {
        &TerminalConfirm
    };

    match &cli.command {
        Some(Command::Deploy) => deploy::run(&ctx, log),
        Some(Command::Backup) => backup::run(&ctx, log),
        Some(Command::Capture { paths }) => capture::run(&ctx, log, paths),
        Some(Command::Clear) => clear::run(&ctx, log, confirm),
        Some(Command::Install) => install::run(&ctx, &executor, log),
        Some(Command::Run) => full::run(&ctx, &executor, log, confirm),
        None => menu::run(&ctx, &executor, log, confirm),
    }
}

/// Print the operation summary and turn per-file failures into a non-zero
/// exit.
pub(crate) fn finish(log: &dyn Log, operation: &str, stats: SyncStats) -> Result<()> {
    log.info(&format!(
        "{operation}: {} succeeded, {} failed",
        stats.succeeded, stats.failed
    ));
    if stats.has_failures() {
        bail!("{operation} completed with {} failure(s)", stats.failed);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::MemoryLog;

    #[test]
    fn resolve_honors_explicit_flags() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let opts = GlobalOpts {
            root: Some(root.path().to_path_buf()),
            home: Some(home.path().to_path_buf()),
            yes: false,
        };

        let ctx = RunContext::resolve(&opts).unwrap();
        assert_eq!(ctx.root, root.path());
        assert_eq!(ctx.home, home.path());
        // No conf/apps.toml in the temp root, so the built-in manifest loads.
        assert!(!ctx.config.manifest.apps.is_empty());
    }

    #[test]
    fn resolve_loads_manifest_from_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("conf")).unwrap();
        std::fs::write(
            root.path().join("conf/apps.toml"),
            "[sync]\nowner = \"Ada\"\n",
        )
        .unwrap();
        let home = tempfile::tempdir().unwrap();
        let opts = GlobalOpts {
            root: Some(root.path().to_path_buf()),
            home: Some(home.path().to_path_buf()),
            yes: false,
        };

        let ctx = RunContext::resolve(&opts).unwrap();
        assert_eq!(ctx.config.manifest.owner, "Ada");
    }

    #[test]
    fn finish_without_failures_is_ok() {
        let log = MemoryLog::new();
        let stats = SyncStats {
            succeeded: 3,
            failed: 0,
        };
        assert!(finish(&log, "deploy", stats).is_ok());
        assert_eq!(log.messages_of("info"), vec!["deploy: 3 succeeded, 0 failed"]);
    }

    #[test]
    fn finish_with_failures_is_error() {
        let log = MemoryLog::new();
        let stats = SyncStats {
            succeeded: 1,
            failed: 2,
        };
        let err = finish(&log, "capture", stats).unwrap_err();
        assert!(err.to_string().contains("2 failure(s)"));
    }
}
