//! Shared helpers for the CLI integration tests.
//!
//! - [`CliRunner`] runs the built `mathquiz` binary with its own environment
//!   and stdin, so configuration tests never touch this process's variables.
//! - [`run_in_process`] drives `mathquiz_cli::run_with_input` with in-memory
//!   buffers.
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const CONFIG_VARS: &[&str] = &[
    "MATHQUIZ_CONFIG",
    "MATHQUIZ_MODE",
    "MATHQUIZ_SEED",
    "MATHQUIZ_FEEDBACK_MS",
];

#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).expect("stdout is JSON")
    }
}

#[derive(Debug)]
pub struct CliRunner {
    binary_path: PathBuf,
    temp_dir: tempfile::TempDir,
}

impl CliRunner {
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_mathquiz")),
            temp_dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_with(args, &[], "")
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResult {
        self.run_with(args, env, "")
    }

    /// Runs the binary with `MATHQUIZ_*` cleared, then `env` applied.
    pub fn run_with(&self, args: &[&str], env: &[(&str, &str)], stdin: &str) -> CliResult {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        for (key, value) in env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().expect("spawn mathquiz");
        if let Some(mut input) = child.stdin.take() {
            input.write_all(stdin.as_bytes()).expect("write stdin");
        }
        let output = child.wait_with_output().expect("wait for mathquiz");
        CliResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Writes `contents` to a file in the runner's scratch directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).expect("write file");
        path
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }
}

pub fn run_in_process(args: &[&str], input: &str) -> CliResult {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["mathquiz"];
    argv.extend_from_slice(args);
    let code = mathquiz_cli::run_with_input(
        argv,
        std::io::Cursor::new(input.to_string()),
        &mut out,
        &mut err,
    );
    CliResult {
        exit_code: code,
        stdout: String::from_utf8(out).expect("utf8 stdout"),
        stderr: String::from_utf8(err).expect("utf8 stderr"),
    }
}
