//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for testing `warden` CLI behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const WARDEN_TIMEOUT_CONNECT_MS: &str = "2000";
const WARDEN_TIMEOUT_EXIT_MS: &str = "500";
const WARDEN_TIMEOUT_IPC_MS: &str = "500";
const WARDEN_CONNECT_POLL_MS: &str = "5";

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a binary, checking llvm-cov target directory first.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn warden_binary() -> PathBuf {
    binary_path("warden")
}

/// Returns the path to the wardend daemon binary.
pub fn wardend_binary() -> PathBuf {
    binary_path("wardend")
}

pub fn warden_cmd() -> Command {
    Command::new(warden_binary())
}

/// Create a CLI builder for `warden` commands.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: vec![
                (
                    "WARDEN_DAEMON_BINARY".into(),
                    wardend_binary().to_string_lossy().into(),
                ),
                (
                    "WARDEN_TIMEOUT_CONNECT_MS".into(),
                    WARDEN_TIMEOUT_CONNECT_MS.into(),
                ),
                ("WARDEN_TIMEOUT_EXIT_MS".into(), WARDEN_TIMEOUT_EXIT_MS.into()),
                ("WARDEN_TIMEOUT_IPC_MS".into(), WARDEN_TIMEOUT_IPC_MS.into()),
                (
                    "WARDEN_CONNECT_POLL_MS".into(),
                    WARDEN_CONNECT_POLL_MS.into(),
                ),
            ],
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    pub fn command(self) -> Command {
        let mut cmd = warden_cmd();
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// An isolated device directory: its own state dir, so tests never share
/// a daemon socket or WAL with each other or with a real install.
pub struct Device {
    state_dir: tempfile::TempDir,
}

impl Device {
    pub fn new() -> Self {
        Self {
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    pub fn warden(&self) -> CliBuilder {
        cli().env("WARDEN_STATE_DIR", self.state_path())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        let mut cmd = self.warden().args(&["daemon", "stop", "--kill"]).command();
        cmd.stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}
