//! Software installation via Homebrew.
//!
//! The installer exposes the external-collaborator contract the
//! synchronizer relies on — a presence check and an install/upgrade action —
//! plus the Homebrew bootstrap, font download, and post-install hooks. All
//! subprocess work goes through [`Executor`] so every path is testable with
//! a mock.

pub mod fetch;
pub mod hooks;

use std::path::{Path, PathBuf};

use crate::config::{AppSpec, InstallMethod, Manifest};
use crate::error::InstallError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::sync::SyncStats;

/// Fira Code release archive installed into the user's font directory.
const FIRA_CODE_URL: &str =
    "https://github.com/tonsky/FiraCode/releases/download/6.2/Fira_Code_v6.2.zip";

/// Official Homebrew bootstrap, run when `brew` is not on `PATH`.
const HOMEBREW_INSTALL: &str =
    r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

/// Installs and upgrades the applications in the manifest.
pub struct Installer<'a> {
    manifest: &'a Manifest,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
    root: PathBuf,
    home: PathBuf,
}

impl std::fmt::Debug for Installer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("apps", &self.manifest.apps.len())
            .field("root", &self.root)
            .field("home", &self.home)
            .finish_non_exhaustive()
    }
}

impl<'a> Installer<'a> {
    /// Create an installer over the given manifest.
    #[must_use]
    pub fn new(
        manifest: &'a Manifest,
        executor: &'a dyn Executor,
        log: &'a dyn Log,
        root: &Path,
        home: &Path,
    ) -> Self {
        Self {
            manifest,
            executor,
            log,
            root: root.to_path_buf(),
            home: home.to_path_buf(),
        }
    }

    /// The command executor (used by hooks).
    #[must_use]
    pub const fn executor(&self) -> &dyn Executor {
        self.executor
    }

    /// The display surface (used by hooks).
    #[must_use]
    pub const fn log(&self) -> &dyn Log {
        self.log
    }

    /// The user's home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Download scratch directory `<root>/downloads/<sub>`.
    #[must_use]
    pub fn downloads_dir(&self, sub: &str) -> PathBuf {
        self.root.join("downloads").join(sub)
    }

    /// Make sure Homebrew is present and up to date.
    ///
    /// # Errors
    ///
    /// Returns an error when Homebrew is missing and the bootstrap fails,
    /// or when `brew update` fails — either way the caller must skip the
    /// rest of the install phase.
    pub fn ensure_homebrew(&self) -> Result<(), InstallError> {
        self.log.step("Checking Homebrew installation...");

        if self.executor.which("brew") {
            self.log.success("Homebrew is already installed. Updating...");
            self.log
                .warn("This may take a few minutes. Please enter your password if prompted.");
            let ok = self
                .executor
                .run_interactive("brew", &["update"])
                .map_err(|e| InstallError::CommandFailed {
                    action: "updating Homebrew".to_string(),
                    detail: e.to_string(),
                })?;
            if ok {
                Ok(())
            } else {
                Err(InstallError::CommandFailed {
                    action: "updating Homebrew".to_string(),
                    detail: "brew update exited non-zero".to_string(),
                })
            }
        } else {
            self.log.warn("Homebrew not found. Installing...");
            self.log
                .warn("This may take a few minutes. Please enter your password if prompted.");
            let ok = self
                .executor
                .run_interactive("/bin/bash", &["-c", HOMEBREW_INSTALL])
                .map_err(|_| InstallError::BrewUnavailable)?;
            if ok { Ok(()) } else { Err(InstallError::BrewUnavailable) }
        }
    }

    /// Presence check: any configured location exists, or `brew list` knows
    /// the package.
    #[must_use]
    pub fn is_installed(&self, app: &AppSpec) -> bool {
        if app.locations.iter().any(|location| location.exists()) {
            return true;
        }
        self.executor
            .run("brew", &["list", &app.package])
            .is_ok_and(|r| r.success)
    }

    /// Install the app, or upgrade it when already present.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the brew diagnostic when the command exits
    /// non-zero or cannot be spawned.
    pub fn install_or_upgrade(&self, app: &AppSpec) -> Result<(), InstallError> {
        let (verb, action) = if self.is_installed(app) {
            ("upgrade", format!("upgrading {}", app.name))
        } else {
            ("install", format!("installing {}", app.name))
        };

        let mut args = vec![verb];
        if app.method == InstallMethod::Cask {
            args.push("--cask");
        }
        args.push(&app.package);

        let result = self
            .executor
            .run("brew", &args)
            .map_err(|e| InstallError::CommandFailed {
                action: action.clone(),
                detail: e.to_string(),
            })?;
        if result.success {
            Ok(())
        } else {
            Err(InstallError::CommandFailed {
                action,
                detail: result.detail(),
            })
        }
    }

    /// Run the whole install phase: Homebrew bootstrap, fonts, then every
    /// manifest app with its post-install hooks. Per-item failures are
    /// counted and reported; only a Homebrew failure aborts the phase.
    ///
    /// # Errors
    ///
    /// Returns an error when Homebrew is unavailable.
    pub fn install_all(&self) -> Result<SyncStats, InstallError> {
        self.ensure_homebrew()?;

        let mut stats = SyncStats::default();

        self.log.step("Installing Fira Code font...");
        match self.install_fira_code() {
            Ok(()) => {
                self.log.success("Fira Code font installed successfully");
                stats.succeeded += 1;
            }
            Err(e) => {
                self.log.failure(&e.to_string());
                stats.failed += 1;
            }
        }

        for app in &self.manifest.apps {
            self.log.step(&format!("Installing {}...", app.name));
            match self.install_app(app) {
                Ok(()) => {
                    self.log
                        .success(&format!("{} installed successfully", app.name));
                    stats.succeeded += 1;
                }
                Err(e) => {
                    self.log.failure(&e.to_string());
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    fn install_app(&self, app: &AppSpec) -> Result<(), InstallError> {
        if self.is_installed(app) {
            self.log
                .info(&format!("{} is already installed. Updating...", app.name));
        }
        self.install_or_upgrade(app)?;

        for hook in &app.post_install {
            // Identifiers were validated at registry construction.
            if let Some(run_hook) = hooks::resolve(hook) {
                run_hook(self, app)?;
            }
        }
        Ok(())
    }

    /// Download the Fira Code release and extract it into the user's font
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the download or extraction fails.
    pub fn install_fira_code(&self) -> Result<(), InstallError> {
        let archive = self.downloads_dir("other").join("FiraCode.zip");
        fetch::download(FIRA_CODE_URL, &archive)?;
        let fonts_dir = self.home.join("Library").join("Fonts");
        fetch::extract_zip(self.executor, &archive, &fonts_dir)
    }

    /// Cleanup and finalization: set zsh as the login shell, clean the
    /// Homebrew cache, and verify every manifest app. Failures are logged,
    /// never fatal.
    pub fn finalize(&self) {
        self.log.stage("Cleanup and Finalization");

        self.set_default_shell();

        self.log.step("Cleaning up Homebrew...");
        match self.executor.run("brew", &["cleanup"]) {
            Ok(result) if result.success => self.log.success("Homebrew cleanup completed"),
            Ok(result) => self
                .log
                .failure(&format!("Homebrew cleanup failed: {}", result.detail())),
            Err(e) => self.log.failure(&format!("Homebrew cleanup failed: {e}")),
        }

        self.log.step("Verifying installations...");
        for app in &self.manifest.apps {
            if self.is_installed(app) {
                self.log.success(&format!("{} is installed", app.name));
            } else {
                self.log.failure(&format!("{} not found", app.name));
            }
        }

        self.log
            .warn("It's recommended to restart your system to ensure all changes take effect.");
    }

    fn set_default_shell(&self) {
        self.log.step("Setting zsh as the default shell...");
        let Some(zsh) = self.manifest.apps.iter().find(|a| a.id == "zsh") else {
            self.log.warn("no zsh entry in the app manifest; skipping");
            return;
        };
        let Some(path) = zsh.locations.iter().find(|l| l.exists()) else {
            self.log
                .failure("zsh not found in any of the expected locations");
            return;
        };

        let path_arg = path.to_string_lossy();
        match self.executor.run_interactive("chsh", &["-s", &path_arg]) {
            Ok(true) => self.log.success("zsh set as default shell"),
            Ok(false) => self.log.failure("failed to set zsh as default shell"),
            Err(e) => self
                .log
                .failure(&format!("failed to set zsh as default shell: {e}")),
        }
    }
}
