//! Test environment for isolated jsonfold runs.
//!
//! Provides `TestEnv` - a temp project directory with helpers to lay out
//! JSON sources, write `config.json` and run the jsonfold binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Result of running a jsonfold CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project directory
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Path relative to the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Write `config.json` from a JSON value
    pub fn write_config(&self, config: &serde_json::Value) -> PathBuf {
        self.write("config.json", &serde_json::to_string_pretty(config).unwrap())
    }

    /// Run jsonfold to completion from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_jsonfold"))
            .args(args)
            .current_dir(self.root.path())
            .env_remove("RUST_LOG")
            .env_remove("JSONFOLD_DELAY")
            .output()
            .expect("failed to run jsonfold");

        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Start jsonfold in the background from the project root
    pub fn spawn(&self, args: &[&str]) -> Child {
        Command::new(env!("CARGO_BIN_EXE_jsonfold"))
            .args(args)
            .current_dir(self.root.path())
            .env_remove("JSONFOLD_DELAY")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to start jsonfold")
    }
}

/// Poll `check` until it returns true or `timeout` passes
pub fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(25));
    }
    check()
}

/// Poll until `path` exists and its content satisfies `check`
pub fn wait_for_content(path: &Path, timeout: Duration, check: impl Fn(&str) -> bool) -> bool {
    wait_for(timeout, || {
        fs::read_to_string(path)
            .map(|content| check(&content))
            .unwrap_or(false)
    })
}
