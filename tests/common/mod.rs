//! Shared testing utilities for envgroup tests.

use assert_cmd::Command;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mockito::{Mock, Server, ServerGuard};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const OWNER: &str = "acme";
pub const REPO: &str = "ci-config";

/// Inputs the runner may have set in the parent environment.
const INHERITED_INPUTS: &[&str] = &[
    "INPUT_URL",
    "INPUT_ORG",
    "INPUT_REPO",
    "INPUT_GROUPS",
    "INPUT_TOKEN",
    "INPUT_APP-ID",
    "INPUT_PRIVATE-KEY",
    "INPUT_TIMEOUT-SECS",
    "INPUT_LOG-LEVEL",
    "GITHUB_ACTIONS",
];

/// Testing harness: a mock contents API plus an isolated env file.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    env_file: PathBuf,
    pub server: ServerGuard,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let env_file = root.path().join("github_env");
        Self { root, env_file, server: Server::new() }
    }

    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    pub fn env_lines(&self) -> Vec<String> {
        fs::read_to_string(&self.env_file)
            .unwrap_or_default()
            .lines()
            .map(ToOwned::to_owned)
            .collect()
    }

    fn contents_path(path: &str) -> String {
        format!("/repos/{}/{}/contents/{}", OWNER, REPO, path)
    }

    /// Serve `yaml` as a base64 file at `path`.
    pub fn serve_file(&mut self, path: &str, yaml: &str) -> Mock {
        let body = serde_json::json!({
            "type": "file",
            "path": path,
            "encoding": "base64",
            "content": STANDARD.encode(yaml),
        });
        self.server
            .mock("GET", Self::contents_path(path).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }

    /// Serve a directory listing of files at `path`.
    pub fn serve_directory(&mut self, path: &str, children: &[&str]) -> Mock {
        let body: Vec<_> = children
            .iter()
            .map(|child| serde_json::json!({ "type": "file", "path": child }))
            .collect();
        self.server
            .mock("GET", Self::contents_path(path).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::Value::Array(body).to_string())
            .create()
    }

    pub fn serve_status(&mut self, path: &str, status: usize, message: &str) -> Mock {
        self.server
            .mock("GET", Self::contents_path(path).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "message": message }).to_string())
            .create()
    }

    /// Build a command for the compiled `envgroup` binary with action inputs set.
    pub fn cli(&self, groups: &str) -> Command {
        let mut cmd = Command::cargo_bin("envgroup").expect("Failed to locate envgroup binary");
        for name in INHERITED_INPUTS {
            cmd.env_remove(name);
        }
        cmd.current_dir(self.root.path())
            .env("INPUT_URL", self.server.url())
            .env("INPUT_ORG", OWNER)
            .env("INPUT_REPO", REPO)
            .env("INPUT_GROUPS", groups)
            .env("GITHUB_ENV", &self.env_file);
        cmd
    }
}
