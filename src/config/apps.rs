//! Application manifest: which software to install and how.
//!
//! The manifest is TOML (`conf/apps.toml`); a built-in copy is used when the
//! file is absent. Post-install hooks are referenced by identifier and
//! resolved against the hook table at parse time, so a typo fails startup
//! instead of being silently skipped at install time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RegistryError;

/// Marker attribution owner used when the manifest does not set one.
pub const DEFAULT_OWNER: &str = "Henry";

/// Manifest used when `conf/apps.toml` does not exist.
pub const DEFAULT_MANIFEST: &str = r#"
[sync]
owner = "Henry"

[apps.kitty]
name = "Kitty"
method = "formula"
locations = ["/Applications/kitty.app", "/opt/homebrew/bin/kitty"]
post-install = ["kitty-icon"]

[apps.vim]
name = "Vim"
method = "formula"

[apps.nvim]
name = "Neovim"
method = "formula"
package = "neovim"

[apps.zsh]
name = "Zsh"
method = "formula"
locations = ["/bin/zsh", "/usr/local/bin/zsh", "/opt/homebrew/bin/zsh"]

[apps.emacs]
name = "Emacs"
method = "cask"
locations = ["/Applications/Emacs.app"]

[apps.tree]
name = "Tree"
method = "formula"
"#;

/// How an application is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    /// Plain Homebrew formula.
    Formula,
    /// Homebrew cask (GUI application bundle).
    Cask,
}

/// One installable application, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    /// Stable identifier (manifest key).
    pub id: String,
    /// Display name for console output.
    pub name: String,
    /// Install method.
    pub method: InstallMethod,
    /// Homebrew package name; defaults to `id`.
    pub package: String,
    /// Filesystem locations whose presence means "installed".
    pub locations: Vec<PathBuf>,
    /// Validated post-install hook identifiers.
    pub post_install: Vec<String>,
}

/// A parsed manifest: sync settings plus the app registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Owner whose name appears in the custom-section marker lines.
    pub owner: String,
    /// Immutable registry of installable apps, ordered by id.
    pub apps: Vec<AppSpec>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    sync: RawSync,
    #[serde(default)]
    apps: BTreeMap<String, RawApp>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawSync {
    owner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawApp {
    name: Option<String>,
    method: InstallMethod,
    package: Option<String>,
    #[serde(default)]
    locations: Vec<PathBuf>,
    #[serde(default)]
    post_install: Vec<String>,
}

/// Parse a manifest, validating every hook reference against `known_hooks`.
///
/// `path` is used only for error reporting.
///
/// # Errors
///
/// Returns an error on invalid TOML or an unknown hook identifier.
pub fn parse(text: &str, path: &Path, known_hooks: &[&str]) -> Result<Manifest, RegistryError> {
    let raw: RawManifest = toml::from_str(text).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut apps = Vec::with_capacity(raw.apps.len());
    for (id, app) in raw.apps {
        for hook in &app.post_install {
            if !known_hooks.contains(&hook.as_str()) {
                return Err(RegistryError::UnknownHook {
                    app: id,
                    hook: hook.clone(),
                });
            }
        }
        apps.push(AppSpec {
            name: app.name.unwrap_or_else(|| id.clone()),
            package: app.package.unwrap_or_else(|| id.clone()),
            method: app.method,
            locations: app.locations,
            post_install: app.post_install,
            id,
        });
    }

    Ok(Manifest {
        owner: raw.sync.owner.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
        apps,
    })
}
