//! Shared testing utilities for gitnotes integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const OWNER: &str = "ada";
pub const REPO: &str = "notes";

/// Isolated working directory with no ambient configuration.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    pub fn work_dir(&self) -> &Path {
        self.root.path()
    }

    /// Write a config file pointing the GitHub API at `api_url`.
    pub fn write_config(&self, api_url: &str) -> PathBuf {
        let path = self.root.path().join("gitnotes.toml");
        let content = format!("[github]\napi_url = \"{}\"\ntimeout_secs = 5\n", api_url);
        fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// Build a command for the `gitnotes` binary with a scrubbed environment.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("gitnotes").expect("Failed to locate gitnotes binary");
        cmd.current_dir(self.work_dir())
            .env_remove("GITNOTES_CONFIG")
            .env_remove("GITNOTES_TOKEN")
            .env_remove("GITNOTES_OAUTH_CLIENT_ID")
            .env_remove("GITNOTES_OAUTH_CLIENT_SECRET")
            .env_remove("GITNOTES_AUTHOR_NAME")
            .env_remove("GITNOTES_AUTHOR_EMAIL")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `cli()` with a token set.
    pub fn signed_in_cli(&self) -> Command {
        let mut cmd = self.cli();
        cmd.env("GITNOTES_TOKEN", "gho_test");
        cmd
    }
}

/// Repository selection flags for note commands.
#[allow(dead_code)]
pub fn repo_args() -> [&'static str; 4] {
    ["--owner", OWNER, "--repo", REPO]
}
