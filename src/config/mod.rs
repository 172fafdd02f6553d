//! Configuration loading for the personalization engine.

pub mod apps;

use std::path::Path;

use crate::error::RegistryError;

pub use apps::{AppSpec, InstallMethod, Manifest};

/// All loaded configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Parsed application manifest and sync settings.
    pub manifest: Manifest,
}

impl Config {
    /// Load `conf/apps.toml` from the repository root, falling back to the
    /// built-in manifest when the file does not exist.
    ///
    /// `known_hooks` is the set of resolvable post-install hook identifiers;
    /// any reference outside it fails here, at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if any hook reference is unknown.
    pub fn load(root: &Path, known_hooks: &[&str]) -> Result<Self, RegistryError> {
        let path = root.join("conf").join("apps.toml");
        let manifest = if path.is_file() {
            let text = std::fs::read_to_string(&path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            apps::parse(&text, &path, known_hooks)?
        } else {
            apps::parse(apps::DEFAULT_MANIFEST, &path, known_hooks)?
        };
        Ok(Self { manifest })
    }
}
