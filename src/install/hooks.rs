//! Post-install hooks, resolved by identifier at registry-construction time.
//!
//! The manifest references hooks by name; [`names`] feeds registry
//! validation so unknown identifiers fail at startup, and [`resolve`] maps a
//! validated identifier to its implementation.

use std::path::PathBuf;

use super::{Installer, fetch};
use crate::config::AppSpec;
use crate::error::InstallError;

/// Upstream archive of the custom Kitty icon set.
const KITTY_ICON_REPO_URL: &str =
    "https://github.com/k0nserv/kitty-icon/archive/refs/heads/master.zip";

/// A post-install hook implementation.
pub type HookFn = fn(&Installer<'_>, &AppSpec) -> Result<(), InstallError>;

/// Identifier → implementation table. One entry per supported hook.
const TABLE: &[(&str, HookFn)] = &[("kitty-icon", install_kitty_icon as HookFn)];

/// Every resolvable hook identifier, for manifest validation.
#[must_use]
pub fn names() -> Vec<&'static str> {
    TABLE.iter().map(|(name, _)| *name).collect()
}

/// Look up a hook implementation by identifier.
#[must_use]
pub fn resolve(name: &str) -> Option<HookFn> {
    TABLE
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, f)| *f)
}

/// Download the kitty-icon repository and install the `neue_outrun` icon
/// into the Kitty config directory.
fn install_kitty_icon(installer: &Installer<'_>, _app: &AppSpec) -> Result<(), InstallError> {
    installer.log().step("Installing custom Kitty icon...");

    let repos_dir = installer.downloads_dir("repos");
    let archive = repos_dir.join("kitty-icon.zip");
    fetch::download(KITTY_ICON_REPO_URL, &archive)?;
    fetch::extract_zip(installer.executor(), &archive, &repos_dir)?;

    let icon = extracted_icon_path(&repos_dir)?;
    let config_dir = installer.home().join(".config").join("kitty");
    std::fs::create_dir_all(&config_dir).map_err(|e| InstallError::Io {
        action: "creating directory",
        path: config_dir.clone(),
        source: e,
    })?;
    let dest = config_dir.join("kitty.app.icns");
    std::fs::copy(&icon, &dest).map_err(|e| InstallError::Io {
        action: "copying",
        path: icon.clone(),
        source: e,
    })?;

    installer
        .log()
        .info("The icon will be applied automatically when Kitty starts.");
    // Dock refresh is cosmetic; a failure here is not a hook failure.
    let _ = installer.executor().run("killall", &["Dock"]);
    Ok(())
}

/// Locate `build/neue_outrun.icns` inside the extracted `kitty-icon-*`
/// directory.
fn extracted_icon_path(repos_dir: &std::path::Path) -> Result<PathBuf, InstallError> {
    let entries = std::fs::read_dir(repos_dir).map_err(|e| InstallError::Io {
        action: "reading directory",
        path: repos_dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        let is_icon_repo = path.is_dir()
            && entry
                .file_name()
                .to_string_lossy()
                .starts_with("kitty-icon-");
        if is_icon_repo {
            let icon = path.join("build").join("neue_outrun.icns");
            if icon.is_file() {
                return Ok(icon);
            }
            return Err(InstallError::MissingArtifact { path: icon });
        }
    }

    Err(InstallError::MissingArtifact {
        path: repos_dir.join("kitty-icon-*"),
    })
}
