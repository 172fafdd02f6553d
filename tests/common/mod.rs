//! Shared fixture for integration tests: a temporary repository root and
//! home directory wired into a [`RunContext`].

#![allow(clippy::expect_used, dead_code)]

use std::path::Path;

use dotsync_cli::cli::GlobalOpts;
use dotsync_cli::commands::RunContext;

pub struct Workspace {
    pub root: tempfile::TempDir,
    pub home: tempfile::TempDir,
}

impl Workspace {
    /// A workspace with an empty dotfiles directory and an app-free
    /// manifest, so no test touches Homebrew or the network.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp root");
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::create_dir_all(root.path().join("dotfiles")).expect("create dotfiles dir");
        std::fs::create_dir_all(root.path().join("conf")).expect("create conf dir");
        std::fs::write(
            root.path().join("conf/apps.toml"),
            "[sync]\nowner = \"Henry\"\n",
        )
        .expect("write manifest");
        Self { root, home }
    }

    pub fn context(&self) -> RunContext {
        RunContext::resolve(&GlobalOpts {
            root: Some(self.root.path().to_path_buf()),
            home: Some(self.home.path().to_path_buf()),
            yes: true,
        })
        .expect("resolve context")
    }

    pub fn track(&self, rel: &str, content: &str) {
        write(&self.root.path().join("dotfiles").join(rel), content);
    }

    pub fn home_write(&self, rel: &str, content: &str) {
        write(&self.home.path().join(rel), content);
    }

    pub fn home_read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home.path().join(rel)).expect("read home file")
    }

    pub fn repo_read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.path().join("dotfiles").join(rel))
            .expect("read repo file")
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
