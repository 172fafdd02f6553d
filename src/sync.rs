//! Dotfile synchronization: deploy, capture, backup, and clear.
//!
//! The tracked file set is every regular file under `<root>/dotfiles`,
//! identified by its path relative to that directory and discovered fresh on
//! every run. Each operation processes files one at a time, streams per-file
//! progress through [`Log`], and tallies a success/failure pair; per-file
//! errors never abort a run.

use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::fsops;
use crate::logging::Log;
use crate::markers::{ExtractMode, Markers};

/// Subdirectory of the root holding repository-tracked dotfiles.
const DOTFILES_DIR: &str = "dotfiles";
/// Subdirectory of the root holding timestamped backups.
const BACKUPS_DIR: &str = "backups";
/// Distinguished sub-path for backups taken outside a full deploy run.
const STANDALONE_DIR: &str = "_standalones";

/// Running success/failure tally for one operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    /// Files processed successfully.
    pub succeeded: u32,
    /// Files that failed (missing source, no sections, I/O error).
    pub failed: u32,
}

impl SyncStats {
    /// Whether any per-file failure was recorded.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Outcome of [`Syncer::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The backup root existed and was deleted.
    Cleared,
    /// The backup root did not exist; nothing to do.
    NothingToClear,
}

/// Drives one synchronization operation over the tracked file set.
pub struct Syncer<'a> {
    dotfiles_dir: PathBuf,
    backup_root: PathBuf,
    home: PathBuf,
    markers: Markers,
    log: &'a dyn Log,
}

impl std::fmt::Debug for Syncer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Syncer")
            .field("dotfiles_dir", &self.dotfiles_dir)
            .field("backup_root", &self.backup_root)
            .field("home", &self.home)
            .field("markers", &self.markers)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl<'a> Syncer<'a> {
    /// Create a synchronizer rooted at the repository `root`, targeting
    /// `home`.
    #[must_use]
    pub fn new(root: &Path, home: &Path, markers: Markers, log: &'a dyn Log) -> Self {
        Self {
            dotfiles_dir: root.join(DOTFILES_DIR),
            backup_root: root.join(BACKUPS_DIR),
            home: home.to_path_buf(),
            markers,
            log,
        }
    }

    /// The tracked file set: relative paths under `<root>/dotfiles`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the dotfiles directory is missing or unreadable.
    pub fn tracked_files(&self) -> Result<Vec<PathBuf>, SyncError> {
        if !self.dotfiles_dir.is_dir() {
            return Err(SyncError::MissingSource {
                path: self.dotfiles_dir.clone(),
            });
        }
        fsops::collect_relative_files(&self.dotfiles_dir)
    }

    /// Create a fresh timestamped backup directory for this run.
    ///
    /// Standalone backups live under `backups/_standalones/<stamp>` so they
    /// are distinguishable from backups taken by a full deploy run.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create_backup_dir(&self, standalone: bool) -> Result<PathBuf, SyncError> {
        let stamp = fsops::timestamp();
        let dir = if standalone {
            self.backup_root.join(STANDALONE_DIR).join(stamp)
        } else {
            self.backup_root.join(stamp)
        };
        std::fs::create_dir_all(&dir)
            .map_err(|e| SyncError::io("creating backup directory", &dir, e))?;
        Ok(dir)
    }

    /// Deploy repository content into the home directory.
    ///
    /// For each tracked file the repository content becomes the payload of
    /// exactly one fresh custom section; any static content the user had in
    /// the target survives, stale sections are stripped, and the pre-deploy
    /// file is byte-copied into this run's backup directory first. Running
    /// deploy twice in a row yields a byte-identical home file.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracked set cannot be enumerated or the
    /// backup directory cannot be created; per-file errors are counted.
    pub fn deploy(&self) -> Result<(PathBuf, SyncStats), SyncError> {
        let tracked = self.tracked_files()?;
        let backup_dir = self.create_backup_dir(false)?;
        let mut stats = SyncStats::default();

        for rel in &tracked {
            self.log.step(&format!("Processing: {}", rel.display()));
            match self.deploy_file(rel, &backup_dir) {
                Ok(()) => {
                    self.log.success("added/updated content");
                    stats.succeeded += 1;
                }
                Err(e) => {
                    self.log.failure(&e.to_string());
                    stats.failed += 1;
                }
            }
        }

        Ok((backup_dir, stats))
    }

    fn deploy_file(&self, rel: &Path, backup_dir: &Path) -> Result<(), SyncError> {
        let repo_path = self.dotfiles_dir.join(rel);
        let payload = std::fs::read_to_string(&repo_path)
            .map_err(|e| SyncError::io("reading", &repo_path, e))?;

        let target = self.home.join(rel);
        if target.exists() {
            fsops::copy_preserving(&target, &backup_dir.join(rel))?;
            self.log.success("backed up existing file");

            let existing = std::fs::read_to_string(&target)
                .map_err(|e| SyncError::io("reading", &target, e))?;
            let merged = self.markers.inject(&self.markers.remove(&existing), &payload);
            std::fs::write(&target, merged).map_err(|e| SyncError::io("writing", &target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SyncError::io("creating directory", parent, e))?;
            }
            std::fs::write(&target, self.markers.inject("", &payload))
                .map_err(|e| SyncError::io("writing", &target, e))?;
        }
        Ok(())
    }

    /// Capture custom sections from home files back into the repository.
    ///
    /// `paths` selects specific relative paths; when empty, every tracked
    /// path is captured. The repository file is overwritten with the section
    /// payloads (marker lines stripped) joined by a blank line.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tracked set cannot be enumerated.
    pub fn capture(&self, paths: &[PathBuf]) -> Result<SyncStats, SyncError> {
        let rels = if paths.is_empty() {
            self.log
                .warn("No specific dotfiles provided. Capturing all tracked files.");
            self.tracked_files()?
        } else {
            paths.to_vec()
        };

        let mut stats = SyncStats::default();
        for rel in &rels {
            self.log.step(&format!("Capturing: {}", rel.display()));
            match self.capture_file(rel) {
                Ok(()) => {
                    self.log.success("captured custom sections");
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

    fn capture_file(&self, rel: &Path) -> Result<(), SyncError> {
        let src = self.home.join(rel);
        if !src.is_file() {
            return Err(SyncError::MissingSource { path: src });
        }
        let content =
            std::fs::read_to_string(&src).map_err(|e| SyncError::io("reading", &src, e))?;

        let sections: Vec<String> = self
            .markers
            .extract(&content, ExtractMode::PayloadOnly)
            .into_iter()
            .filter(|payload| !Markers::is_empty_payload(payload))
            .collect();
        if sections.is_empty() {
            return Err(SyncError::NoCustomSections { path: src });
        }

        let dest = self.dotfiles_dir.join(rel);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::io("creating directory", parent, e))?;
        }
        let mut combined = sections.join("\n\n");
        combined.push('\n');
        std::fs::write(&dest, combined).map_err(|e| SyncError::io("writing", &dest, e))
    }

    /// Copy the home counterpart of every tracked file into a fresh
    /// timestamped backup directory, preserving modification times.
    ///
    /// Missing home files are counted as failures but never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracked set cannot be enumerated or the
    /// backup directory cannot be created.
    pub fn backup(&self, standalone: bool) -> Result<(PathBuf, SyncStats), SyncError> {
        let tracked = self.tracked_files()?;
        let backup_dir = self.create_backup_dir(standalone)?;
        let mut stats = SyncStats::default();

        for rel in &tracked {
            self.log.step(&format!("Backing up: {}", rel.display()));
            match self.backup_file(rel, &backup_dir) {
                Ok(()) => {
                    self.log.success("backed up successfully");
                    stats.succeeded += 1;
                }
                Err(e) => {
                    self.log.failure(&e.to_string());
                    stats.failed += 1;
                }
            }
        }

        Ok((backup_dir, stats))
    }

    fn backup_file(&self, rel: &Path, backup_dir: &Path) -> Result<(), SyncError> {
        let src = self.home.join(rel);
        if !src.exists() {
            return Err(SyncError::MissingSource { path: src });
        }
        fsops::copy_preserving(&src, &backup_dir.join(rel))
    }

    /// Delete the entire backup root recursively.
    ///
    /// An absent backup root is a benign no-op, not a failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing backup tree cannot be removed.
    pub fn clear(&self) -> Result<ClearOutcome, SyncError> {
        if !self.backup_root.exists() {
            return Ok(ClearOutcome::NothingToClear);
        }
        std::fs::remove_dir_all(&self.backup_root)
            .map_err(|e| SyncError::io("removing", &self.backup_root, e))?;
        Ok(ClearOutcome::Cleared)
    }

    /// The backup root directory (`<root>/backups`).
    #[must_use]
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::MemoryLog;

    struct Fixture {
        root: tempfile::TempDir,
        home: tempfile::TempDir,
        log: MemoryLog,
    }

    impl Fixture {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(root.path().join("dotfiles")).unwrap();
            Self {
                root,
                home: tempfile::tempdir().unwrap(),
                log: MemoryLog::new(),
            }
        }

        fn syncer(&self) -> Syncer<'_> {
            Syncer::new(
                self.root.path(),
                self.home.path(),
                Markers::for_owner("X"),
                &self.log,
            )
        }

        fn track(&self, rel: &str, content: &str) {
            let path = self.root.path().join("dotfiles").join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        fn home_write(&self, rel: &str, content: &str) {
            let path = self.home.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        fn home_read(&self, rel: &str) -> String {
            std::fs::read_to_string(self.home.path().join(rel)).unwrap()
        }

        fn repo_read(&self, rel: &str) -> String {
            std::fs::read_to_string(self.root.path().join("dotfiles").join(rel)).unwrap()
        }
    }

    // -----------------------------------------------------------------------
    // deploy
    // -----------------------------------------------------------------------

    #[test]
    fn deploy_creates_missing_target_with_single_section() {
        let fx = Fixture::new();
        fx.track(".shellrc", "export EDITOR=vim");

        let (_, stats) = fx.syncer().deploy().unwrap();
        assert_eq!(stats, SyncStats { succeeded: 1, failed: 0 });
        assert_eq!(
            fx.home_read(".shellrc"),
            "# >>> X's customizations\nexport EDITOR=vim\n# <<< X's customizations\n"
        );
    }

    #[test]
    fn deploy_preserves_user_content_and_replaces_old_section() {
        let fx = Fixture::new();
        fx.track(".shellrc", "export EDITOR=vim");
        fx.home_write(
            ".shellrc",
            "alias ll='ls -la'\n# >>> X's customizations\nold stuff\n# <<< X's customizations\n",
        );

        let (backup_dir, stats) = fx.syncer().deploy().unwrap();
        assert_eq!(stats.succeeded, 1);
        assert_eq!(
            fx.home_read(".shellrc"),
            "alias ll='ls -la'\n\n# >>> X's customizations\nexport EDITOR=vim\n# <<< X's customizations\n"
        );
        // Pre-deploy file was byte-copied into the run's backup directory.
        assert_eq!(
            std::fs::read_to_string(backup_dir.join(".shellrc")).unwrap(),
            "alias ll='ls -la'\n# >>> X's customizations\nold stuff\n# <<< X's customizations\n"
        );
    }

    #[test]
    fn deploy_twice_is_idempotent() {
        let fx = Fixture::new();
        fx.track(".shellrc", "export EDITOR=vim");
        fx.home_write(".shellrc", "alias ll='ls -la'\n");

        fx.syncer().deploy().unwrap();
        let first = fx.home_read(".shellrc");
        fx.syncer().deploy().unwrap();
        assert_eq!(fx.home_read(".shellrc"), first);
    }

    #[test]
    fn deploy_discards_empty_sections() {
        let fx = Fixture::new();
        fx.track(".shellrc", "new");
        fx.home_write(
            ".shellrc",
            "keep\n# >>> X's customizations\n# <<< X's customizations\n",
        );

        fx.syncer().deploy().unwrap();
        let result = fx.home_read(".shellrc");
        assert_eq!(
            result,
            "keep\n\n# >>> X's customizations\nnew\n# <<< X's customizations\n"
        );
    }

    #[test]
    fn deploy_creates_nested_parent_directories() {
        let fx = Fixture::new();
        fx.track(".config/kitty/kitty.conf", "font_family Fira Code");

        let (_, stats) = fx.syncer().deploy().unwrap();
        assert_eq!(stats.succeeded, 1);
        assert!(
            fx.home_read(".config/kitty/kitty.conf")
                .contains("font_family Fira Code")
        );
    }

    #[test]
    fn deploy_streams_per_file_progress() {
        let fx = Fixture::new();
        fx.track(".a", "1");
        fx.track(".b", "2");

        fx.syncer().deploy().unwrap();
        let steps = fx.log.messages_of("step");
        assert_eq!(steps, vec!["Processing: .a", "Processing: .b"]);
    }

    #[test]
    fn deploy_without_dotfiles_dir_is_error() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let log = MemoryLog::new();
        let syncer = Syncer::new(root.path(), home.path(), Markers::for_owner("X"), &log);
        assert!(syncer.deploy().is_err());
    }

    // -----------------------------------------------------------------------
    // capture
    // -----------------------------------------------------------------------

    #[test]
    fn capture_recovers_deployed_payload() {
        let fx = Fixture::new();
        fx.track(".shellrc", "export EDITOR=vim");
        fx.syncer().deploy().unwrap();

        let stats = fx.syncer().capture(&[]).unwrap();
        assert_eq!(stats, SyncStats { succeeded: 1, failed: 0 });
        assert_eq!(fx.repo_read(".shellrc"), "export EDITOR=vim\n");
    }

    #[test]
    fn capture_joins_multiple_sections_with_blank_line() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(
            ".shellrc",
            "# >>> X's customizations\nfirst\n# <<< X's customizations\nstatic\n# >>> X's customizations\nsecond\n# <<< X's customizations\n",
        );

        fx.syncer().capture(&[PathBuf::from(".shellrc")]).unwrap();
        assert_eq!(fx.repo_read(".shellrc"), "first\n\nsecond\n");
    }

    #[test]
    fn capture_missing_home_file_is_single_failure() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");

        let stats = fx
            .syncer()
            .capture(&[PathBuf::from(".missingrc")])
            .unwrap();
        assert_eq!(stats, SyncStats { succeeded: 0, failed: 1 });
        // The repository copy is untouched.
        assert_eq!(fx.repo_read(".shellrc"), "seed");
    }

    #[test]
    fn capture_without_sections_fails_that_file() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(".shellrc", "just user content\n");

        let stats = fx.syncer().capture(&[PathBuf::from(".shellrc")]).unwrap();
        assert_eq!(stats.failed, 1);
        assert!(
            fx.log.messages_of("failure")[0].contains("no custom sections"),
            "failure should name the cause"
        );
    }

    #[test]
    fn capture_skips_empty_sections() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(
            ".shellrc",
            "# >>> X's customizations\n# <<< X's customizations\n# >>> X's customizations\nreal\n# <<< X's customizations\n",
        );

        let stats = fx.syncer().capture(&[PathBuf::from(".shellrc")]).unwrap();
        assert_eq!(stats.succeeded, 1);
        assert_eq!(fx.repo_read(".shellrc"), "real\n");
    }

    #[test]
    fn capture_with_only_empty_sections_is_failure() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(
            ".shellrc",
            "# >>> X's customizations\n\n# <<< X's customizations\n",
        );

        let stats = fx.syncer().capture(&[PathBuf::from(".shellrc")]).unwrap();
        assert_eq!(stats, SyncStats { succeeded: 0, failed: 1 });
    }

    #[test]
    fn capture_all_warns_when_no_paths_given() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.syncer().deploy().unwrap();
        fx.syncer().capture(&[]).unwrap();
        assert!(
            fx.log
                .messages_of("warn")
                .iter()
                .any(|m| m.contains("all tracked files"))
        );
    }

    // -----------------------------------------------------------------------
    // backup
    // -----------------------------------------------------------------------

    #[test]
    fn backup_copies_existing_home_files() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(".shellrc", "home version\n");

        let (dir, stats) = fx.syncer().backup(false).unwrap();
        assert_eq!(stats, SyncStats { succeeded: 1, failed: 0 });
        assert_eq!(
            std::fs::read_to_string(dir.join(".shellrc")).unwrap(),
            "home version\n"
        );
    }

    #[test]
    fn backup_counts_missing_sources_without_aborting() {
        let fx = Fixture::new();
        fx.track(".present", "a");
        fx.track(".absent", "b");
        fx.home_write(".present", "x");

        let (_, stats) = fx.syncer().backup(false).unwrap();
        assert_eq!(stats, SyncStats { succeeded: 1, failed: 1 });
    }

    #[test]
    fn standalone_backup_uses_distinguished_subpath() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(".shellrc", "x");

        let (dir, _) = fx.syncer().backup(true).unwrap();
        assert!(
            dir.starts_with(fx.root.path().join("backups/_standalones")),
            "standalone backups live under _standalones: {}",
            dir.display()
        );
    }

    #[test]
    fn full_run_backup_is_directly_under_backup_root() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(".shellrc", "x");

        let (dir, _) = fx.syncer().backup(false).unwrap();
        assert_eq!(dir.parent().unwrap(), fx.root.path().join("backups"));
    }

    // -----------------------------------------------------------------------
    // clear
    // -----------------------------------------------------------------------

    #[test]
    fn clear_on_missing_backup_root_is_benign() {
        let fx = Fixture::new();
        assert_eq!(
            fx.syncer().clear().unwrap(),
            ClearOutcome::NothingToClear
        );
    }

    #[test]
    fn clear_removes_backup_tree() {
        let fx = Fixture::new();
        fx.track(".shellrc", "seed");
        fx.home_write(".shellrc", "x");
        fx.syncer().backup(false).unwrap();

        assert_eq!(fx.syncer().clear().unwrap(), ClearOutcome::Cleared);
        assert!(!fx.root.path().join("backups").exists());
    }
}
