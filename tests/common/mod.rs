//! Common test utilities for reclaim integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Create a bare repository directory under `base`, with a couple of
/// loose refs so it looks like a served repository.
pub fn mk_bare_repo(base: &Path, name: &str) -> PathBuf {
    let path = base.join(format!("{name}.git"));
    std::fs::create_dir_all(path.join("refs/heads")).unwrap();
    std::fs::create_dir_all(path.join("refs/tags")).unwrap();
    std::fs::create_dir_all(path.join("objects")).unwrap();
    std::fs::write(path.join("HEAD"), "ref: refs/heads/main\n").unwrap();
    std::fs::write(path.join("refs/heads/main"), "deadbeef\n").unwrap();
    path
}

/// Add a loose tag ref to a repository created by `mk_bare_repo`.
pub fn add_tag(repo: &Path, tag: &str) {
    std::fs::write(repo.join("refs/tags").join(tag), "deadbeef\n").unwrap();
}

/// Isolated site directory plus a runner for the built binary.
pub struct TestEnv {
    pub site: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            site: TempDir::new().unwrap(),
        }
    }

    pub fn base(&self) -> &Path {
        self.site.path()
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.base().join("reclaim.toml"), content).unwrap();
    }

    /// Run the reclaim binary with the site as the base path.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_reclaim"));
        cmd.args(args)
            .arg("--base")
            .arg(self.base())
            .env("USER", "test-admin");
        cmd.output().expect("failed to run reclaim")
    }
}
