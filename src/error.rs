//! Domain-specific error types for the personalization engine.
//!
//! Internal modules return typed errors ([`SyncError`], [`RegistryError`],
//! [`InstallError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Per-file and per-run failures raised by the dotfile synchronizer.
///
/// Per-file variants are recorded in the run's failure count and never abort
/// the run; only the operation driver decides whether the overall run failed.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The home-directory counterpart of a tracked file does not exist.
    #[error("source file not found: {}", path.display())]
    MissingSource {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// A capture found no non-empty custom sections to extract.
    #[error("no custom sections found in {}", path.display())]
    NoCustomSections {
        /// Home-directory file that was scanned.
        path: PathBuf,
    },

    /// An I/O error during read, write, or copy.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. `"reading"`).
        action: &'static str,
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl SyncError {
    /// Wrap an I/O error with the action and path that produced it.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while constructing the application registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A post-install hook identifier does not exist in the hook table.
    #[error("app '{app}' references unknown post-install hook '{hook}'")]
    UnknownHook {
        /// App that referenced the hook.
        app: String,
        /// The unresolvable hook identifier.
        hook: String,
    },

    /// The registry file could not be parsed as TOML.
    #[error("invalid registry file {}: {source}", path.display())]
    Parse {
        /// Path to the registry file.
        path: PathBuf,
        /// Underlying TOML deserialization error.
        source: toml::de::Error,
    },

    /// The registry file exists but could not be read.
    #[error("reading registry file {}: {source}", path.display())]
    Io {
        /// Path to the registry file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised by the software installation phase.
#[derive(Error, Debug)]
pub enum InstallError {
    /// Homebrew is unavailable and could not be installed.
    ///
    /// Fatal for the install phase (every package depends on it); the
    /// dotfile phases are separate operations and are unaffected.
    #[error("Homebrew is not available and could not be installed")]
    BrewUnavailable,

    /// An external command exited non-zero.
    #[error("{action} failed: {detail}")]
    CommandFailed {
        /// What was being attempted (e.g. `"installing Kitty"`).
        action: String,
        /// Trimmed stderr (or stdout) of the failed command.
        detail: String,
    },

    /// A download could not be completed.
    #[error("downloading {url}: {source}")]
    Download {
        /// The URL that failed.
        url: String,
        /// Underlying transport or I/O error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An expected file was missing after a download or extraction.
    #[error("expected artifact not found: {}", path.display())]
    MissingArtifact {
        /// The path that should have existed.
        path: PathBuf,
    },

    /// An I/O error outside of subprocess execution.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
