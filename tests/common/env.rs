//! Test environment builder for isolated Sitefront testing.
//!
//! Provides `TestEnv` - a temp directory holding `site.toml`, the site's
//! `public/` tree, and the local provider's state, plus helpers to run the
//! CLI against it.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{basic_config, INDEX_HTML, LOGO_PNG, STYLE_CSS};

/// Environment variables the CLI reads that must not leak in from the host
const SCRUBBED_ENV: &[&str] = &[
    "SITEFRONT_BUCKET",
    "SITEFRONT_REGION",
    "SITEFRONT_SOURCE",
    "SITEFRONT_PROVIDER",
    "SITEFRONT_LOG",
    "GITHUB_ACTIONS",
];

/// Result of running a Sitefront CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("invalid JSON line {line:?}: {e}"))
            })
            .collect()
    }

    /// The last NDJSON event with the given name
    pub fn json_event(&self, name: &str) -> serde_json::Value {
        self.json_lines()
            .into_iter()
            .rev()
            .find(|event| event["event"] == name)
            .unwrap_or_else(|| panic!("no '{name}' event in:\n{}", self.stdout))
    }
}

/// Isolated site directory
pub struct TestEnv {
    pub root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::default()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Run the CLI from the site directory
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.root.path())
            .args(args)
            .env("NO_COLOR", "1");
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute sitefront");
        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn write_file(&self, relative: &str, content: impl AsRef<[u8]>) {
        let full = self.path(relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full, content).expect("Failed to write file");
    }

    /// Write a file under the site's `public/` directory
    pub fn write_site_file(&self, relative: &str, content: impl AsRef<[u8]>) {
        self.write_file(&format!("public/{relative}"), content);
    }

    pub fn remove_site_file(&self, relative: &str) {
        std::fs::remove_file(self.path(&format!("public/{relative}")))
            .expect("Failed to remove site file");
    }

    pub fn read_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    pub fn state_toml(&self) -> String {
        self.read_file(".sitefront/state.toml")
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    config: Option<String>,
    files: Vec<(String, Vec<u8>)>,
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self {
            config: Some(basic_config()),
            files: Vec::new(),
        }
    }
}

impl TestEnvBuilder {
    /// Replace the generated `site.toml`
    pub fn with_config(mut self, config: &str) -> Self {
        self.config = Some(config.to_string());
        self
    }

    /// Do not write a `site.toml`
    pub fn without_config(mut self) -> Self {
        self.config = None;
        self
    }

    /// Add a file under `public/`
    pub fn with_site_file(mut self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        self.files
            .push((relative.to_string(), content.as_ref().to_vec()));
        self
    }

    /// The usual three-file site: a document, a stylesheet, an image
    pub fn with_basic_site(self) -> Self {
        self.with_site_file("index.html", INDEX_HTML)
            .with_site_file("css/style.css", STYLE_CSS)
            .with_site_file("images/logo.png", LOGO_PNG)
    }

    pub fn build(self) -> TestEnv {
        let env = TestEnv {
            root: TempDir::new().expect("Failed to create temp dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_sitefront")),
        };
        if let Some(config) = &self.config {
            env.write_file("site.toml", config);
        }
        for (relative, content) in &self.files {
            env.write_site_file(relative, content);
        }
        env
    }
}
