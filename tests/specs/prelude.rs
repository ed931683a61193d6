//! Shared helpers for CLI specs

use assert_cmd::assert::Assert;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub use serde_json::{json, Value};

pub const WAIT: Duration = Duration::from_secs(10);

/// A scratch data directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path().join(rel).exists()
    }

    /// Parse a JSON document under the data directory
    pub fn json(&self, rel: &str) -> Value {
        let content = std::fs::read_to_string(self.path().join(rel)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// The CLI pointed at this data directory
    pub fn tandem(&self) -> CliBuilder {
        CliBuilder {
            cmd: self.command(),
        }
    }

    /// Start `tandem serve` and wait until it is ready
    pub fn serve(&self, stores: &[&str]) -> Server {
        let mut cmd = self.command();
        cmd.arg("serve");
        for store in stores {
            cmd.args(["--store", store]);
        }
        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let mut stdout = BufReader::new(child.stdout.take().unwrap());
        let line = read_line(&mut stdout);
        assert_eq!(line.trim(), "READY", "server did not start");
        Server { child }
    }

    /// Start `tandem watch` and wait for the initial document
    pub fn watch(&self, store: &str, count: usize) -> Watcher {
        let mut child = self
            .command()
            .args(["watch", store, "--count", &count.to_string()])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let mut stdout = BufReader::new(child.stdout.take().unwrap());
        let initial = read_document(&mut stdout);
        Watcher {
            child,
            stdout,
            initial,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(binary());
        cmd.arg("--data-dir")
            .arg(self.path())
            .env_remove("TANDEM_DATA_DIR")
            .env("TANDEM_LOG", "warn");
        cmd
    }
}

/// The `tandem` binary from the workspace target directory. It belongs to
/// another package, so cargo does not export its path to these tests.
fn binary() -> PathBuf {
    let target_dir = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("target"));
    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
    let path = target_dir.join(profile).join("tandem");
    assert!(
        path.exists(),
        "{} not found; build it with `cargo build -p tandem`",
        path.display()
    );
    path
}

fn read_line(reader: &mut BufReader<ChildStdout>) -> String {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    line
}

/// Read one pretty-printed document (ends with a line holding `}`)
fn read_document(reader: &mut BufReader<ChildStdout>) -> Value {
    let mut text = String::new();
    loop {
        let line = read_line(reader);
        assert!(!line.is_empty(), "output ended before a full document");
        text.push_str(&line);
        if line.trim_end() == "}" || text.trim() == "{}" {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Poll until `check` holds
pub fn wait_for(what: &str, mut check: impl FnMut() -> bool) {
    let deadline = Instant::now() + WAIT;
    while !check() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(20));
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(self) -> RunAssert {
        RunAssert {
            assert: assert_cmd::Command::from_std(self.cmd).assert().success(),
        }
    }

    pub fn fails(self) -> RunAssert {
        RunAssert {
            assert: assert_cmd::Command::from_std(self.cmd).assert().failure(),
        }
    }
}

pub struct RunAssert {
    assert: Assert,
}

impl RunAssert {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicates::str::contains(expected.to_string())),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stderr(predicates::str::contains(expected.to_string())),
        }
    }

    /// Stdout parsed as one JSON document
    pub fn stdout_json(self) -> Value {
        let output = self.assert.get_output();
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

/// A running `tandem serve`, killed on drop
pub struct Server {
    child: Child,
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A running `tandem watch`
pub struct Watcher {
    child: Child,
    stdout: BufReader<ChildStdout>,
    pub initial: Value,
}

impl Watcher {
    pub fn next(&mut self) -> Value {
        read_document(&mut self.stdout)
    }

    /// Wait for the watcher to exit on its own
    pub fn finish(mut self) {
        let deadline = Instant::now() + WAIT;
        loop {
            if let Some(status) = self.child.try_wait().unwrap() {
                assert!(status.success(), "watch exited with {status}");
                return;
            }
            assert!(Instant::now() < deadline, "watch did not exit");
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
