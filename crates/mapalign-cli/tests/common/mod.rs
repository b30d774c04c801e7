//! Common test utilities for CLI testing.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// Test context with a temporary project directory.
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestContext {
    /// Context with an empty config file, i.e. all defaults.
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("mapalign.yaml");
        std::fs::write(&config_path, "").expect("Failed to write config");

        Self {
            temp_dir,
            config_path,
        }
    }

    /// Replace the config file contents.
    pub fn with_config(self, config: &str) -> Self {
        std::fs::write(&self.config_path, config).expect("Failed to write config");
        self
    }

    /// Single-target config whose render tool is a shell script.
    pub fn with_script_target(self, script: &str) -> Self {
        let config = format!(
            r#"
repositories: []
render:
  program: sh
  args: ["-c", "{script}", "mapmaker"]
matcher:
  grammar: marker
targets:
  - name: rat
    manifest: rat/manifest.json
    output_dir: flatmaps
    log_file: alignment/log/rat.log
    missing_report: alignment/output/rat_missing.csv
    rendered_report: alignment/output/rat_rendered.csv
"#
        );
        self.with_config(&config)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file under the project directory as lines.
    pub fn lines(&self, relative: &str) -> Vec<String> {
        mapalign_test_utils::read_lines(&self.path().join(relative))
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("mapalign").expect("Binary not found");
        cmd.current_dir(self.path())
            .env("MAPALIGN_CONFIG", &self.config_path)
            .env_remove("SCICRUNCH_API_KEY")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
