//! Shared testing utilities for odosetup CLI tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;

/// Template directory name the CLI resolves by default (the literal,
/// un-substituted placeholder form).
pub const TEMPLATE_DIR: &str = "{client_name}-odoo-17-setup";

/// Testing harness providing an isolated working directory for CLI runs.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment with an empty template directory.
    pub fn new() -> Self {
        let ctx = Self { root: TempDir::new().expect("Failed to create temp directory") };
        fs::create_dir_all(ctx.template_dir()).expect("Failed to create template directory");
        ctx
    }

    /// Create an isolated environment without any template directory.
    pub fn without_template() -> Self {
        Self { root: TempDir::new().expect("Failed to create temp directory") }
    }

    /// The working directory CLI invocations run in.
    pub fn work_dir(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for invoking the compiled `odosetup` binary.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("odosetup").expect("Failed to locate odosetup binary");
        cmd.current_dir(self.work_dir());
        cmd
    }

    /// Write a configuration file with sensible test values plus `extra`
    /// lines, returning its name for passing as a CLI argument.
    pub fn write_config(&self, name: &str, extra: &str) -> String {
        let content = format!(
            "client_name=acme\nclient_password=acme2025ok\nuser=ubuntu\nip=203.0.113.7\n\
             path_to_install={}\n{extra}",
            self.work_dir().display()
        );
        self.root.child(name).write_str(&content).expect("Failed to write config");
        name.to_string()
    }

    pub fn template_dir(&self) -> PathBuf {
        self.work_dir().join(TEMPLATE_DIR)
    }

    /// Write a file into the template tree.
    pub fn write_template_file(&self, rel: &str, content: &str) {
        self.root
            .child(format!("{TEMPLATE_DIR}/{rel}"))
            .write_str(content)
            .expect("Failed to write template file");
    }

    /// Target directory derived for the default `acme` client.
    pub fn target_dir(&self) -> PathBuf {
        self.work_dir().join("acme-odoo17-setup")
    }

    pub fn read_target(&self, rel: &str) -> String {
        fs::read_to_string(self.target_dir().join(rel))
            .unwrap_or_else(|e| panic!("Failed to read target file {rel}: {e}"))
    }
}
