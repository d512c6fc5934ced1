//! Build results handed to plugins

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder stored in [`CompilationResult::stdout`] for watch-mode builds,
/// whose output is streamed rather than captured
pub const WATCH_MODE_STDOUT: &str = "(watch mode)";

/// Outcome of a successful compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilationResult {
    /// Configuration the build ran with
    pub config: Config,

    /// Absolute paths of every emitted file, scripts and source maps alike
    pub compiled_files: Vec<PathBuf>,

    /// Captured compiler stdout, or [`WATCH_MODE_STDOUT`]
    pub stdout: String,

    /// Captured compiler stderr
    pub stderr: String,
}

impl CompilationResult {
    /// Result of a one-shot build with captured output
    pub fn new(
        config: Config,
        compiled_files: Vec<PathBuf>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            config,
            compiled_files,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Result of a watch-mode build
    pub fn watch(config: Config, compiled_files: Vec<PathBuf>) -> Self {
        Self::new(config, compiled_files, WATCH_MODE_STDOUT, "")
    }

    /// Whether stdout holds the watch-mode placeholder instead of real output
    pub fn is_watch_placeholder(&self) -> bool {
        self.stdout == WATCH_MODE_STDOUT
    }

    /// Emitted JavaScript files
    pub fn script_files(&self) -> impl Iterator<Item = &Path> {
        self.compiled_files
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| !is_source_map(p))
    }

    /// Emitted source maps
    pub fn source_maps(&self) -> impl Iterator<Item = &Path> {
        self.compiled_files
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| is_source_map(p))
    }
}

fn is_source_map(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "map")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoffeeFlag, CoffeeOptions};

    fn files() -> Vec<PathBuf> {
        vec![
            PathBuf::from("/project/dist/app.js"),
            PathBuf::from("/project/dist/app.js.map"),
            PathBuf::from("/project/dist/util.js"),
        ]
    }

    #[test]
    fn test_watch_result_uses_placeholder() {
        let config = Config::new("src", "dist")
            .with_options(CoffeeOptions::default().with(CoffeeFlag::Watch, true));
        let result = CompilationResult::watch(config, files());

        assert!(result.config.watches());
        assert!(result.is_watch_placeholder());
        assert_eq!(result.stdout, "(watch mode)");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn test_captured_output_is_not_placeholder() {
        let result = CompilationResult::new(Config::new("src", "dist"), files(), "compiled", "");
        assert!(!result.is_watch_placeholder());
    }

    #[test]
    fn test_file_partition() {
        let result = CompilationResult::new(Config::new("src", "dist"), files(), "", "");

        assert_eq!(result.script_files().count(), 2);
        assert_eq!(
            result.source_maps().collect::<Vec<_>>(),
            vec![Path::new("/project/dist/app.js.map")]
        );
    }

    #[test]
    fn test_json_shape() {
        let result = CompilationResult::watch(Config::new("src", "dist"), files());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["config"]["entry"], "src");
        assert_eq!(json["compiledFiles"][1], "/project/dist/app.js.map");
        assert_eq!(json["stdout"], WATCH_MODE_STDOUT);

        let back: CompilationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_every_field_required() {
        let config_only = r#"{ "config": { "entry": "src", "output": "dist" } }"#;
        assert!(serde_json::from_str::<CompilationResult>(config_only).is_err());

        let no_stderr = r#"{
            "config": { "entry": "src", "output": "dist" },
            "compiledFiles": [],
            "stdout": ""
        }"#;
        assert!(serde_json::from_str::<CompilationResult>(no_stderr).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let extra = r#"{
            "config": { "entry": "src", "output": "dist" },
            "compiledFiles": [],
            "stdout": "",
            "stderr": "",
            "exitCode": 0
        }"#;
        assert!(serde_json::from_str::<CompilationResult>(extra).is_err());
    }
}
