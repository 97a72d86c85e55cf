// Shared test helpers for integration tests
#![allow(dead_code)]

use release_matrix::config::MatrixConfig;
use release_matrix::models::EnvironmentAxis;
use std::fs;
use std::path::{Path, PathBuf};

/// A pre-release still carrying the sentinel patchlevel.
pub const RELEASE_SECTION: &str = r#"[release]
version_tuple = [4, 9, 0, "alpha", 0]
unsupported_python_version = [3, 6, 0]
deprecated_python_version = [3, 7, 0]
"#;

/// Fails (and writes the diagnostic log) only on the 3.7 runtime.
pub const FAIL_ON_37: &str =
    "sh -c 'test {runtime} != 3.7 || { echo boom > failed_tests.log; exit 1; }'";

/// Writes `ReleaseMatrix.toml` into `dir`: the default release section
/// followed by `body`.
pub fn write_config(dir: &Path, body: &str) -> PathBuf {
    write_raw_config(dir, &format!("language = \"en\"\n\n{RELEASE_SECTION}\n{body}"))
}

pub fn write_raw_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("ReleaseMatrix.toml");
    fs::write(&path, content).expect("Failed to write config file");
    path
}

/// TOML for a `[matrix]` section with the given axes and test command and
/// no dependency install step.
pub fn matrix_section(axes: &[(&str, &str)], test_command: &str) -> String {
    let mut out = format!(
        "[matrix]\ntest_command = \"{}\"\ninstall_dependencies = \"\"\n",
        test_command.replace('\\', "\\\\").replace('"', "\\\"")
    );
    for (os, runtime) in axes {
        out.push_str(&format!("\n[[matrix.axes]]\nos = \"{os}\"\nruntime = \"{runtime}\"\n"));
    }
    out
}

/// A matrix running `test_command` on `axes` with no other stage.
pub fn matrix_with(axes: &[(&str, &str)], test_command: &str) -> MatrixConfig {
    MatrixConfig {
        axes: axes
            .iter()
            .map(|(os, runtime)| EnvironmentAxis::new(*os, *runtime))
            .collect(),
        test_command: test_command.to_string(),
        install_dependencies: None,
        ..MatrixConfig::default()
    }
}
