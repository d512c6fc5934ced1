//! Configuration validation
//!
//! Deserialization already guarantees the shape of a [`Config`]: required
//! fields are present and every flag is a boolean. This module checks the
//! contracts the types cannot express, such as the relationship between
//! `join` and the kind of path `output` names.
//!
//! # Example
//!
//! ```rust
//! use milkee_core::config::Config;
//! use milkee_core::validation::validate_config;
//!
//! let result = validate_config(&Config::new("src", "dist"));
//! assert!(result.is_valid());
//! ```

use crate::config::{CoffeeFlag, Config};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Whether any error or warning carries `code`
    pub fn has_code(&self, code: &str) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .any(|e| e.code == code)
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::validation(format!(
                "Validation failed: {}",
                messages.join("; ")
            )))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not blank
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate that a path exists
    pub fn path_exists(mut self, field: &str, path: &Path) -> Self {
        if !path.exists() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Path does not exist: {}", path.display()),
                code: "PATH_NOT_FOUND".to_string(),
                expected: Some("existing path".to_string()),
                actual: Some(path.display().to_string()),
            });
        }
        self
    }

    /// Record an error with a specific code when `condition` holds
    pub fn error_if(mut self, field: &str, condition: bool, code: &str, message: &str) -> Self {
        if condition {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: code.to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Add a warning (non-blocking) when `condition` holds
    pub fn warn_if(mut self, field: &str, condition: bool, code: &str, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: code.to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Record an error with `code` when `f` returns a message
    pub fn custom<F>(mut self, field: &str, code: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(message) = f() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message,
                code: code.to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

fn looks_like_directory(path: &str) -> bool {
    path.ends_with('/') || path.ends_with('\\') || Path::new(path).extension().is_none()
}

fn has_script_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "js" | "mjs" | "cjs"))
}

/// Check the contracts of a configuration that its types do not enforce
pub fn validate_config(config: &Config) -> ValidationResult {
    let joins = config.joins();

    let mut validator = Validator::new()
        .required("entry", &config.entry)
        .required("output", &config.output)
        .error_if(
            "output",
            !config.entry.trim().is_empty() && config.output_overlaps_entry(),
            "SAME_PATH",
            "Output must not be the same path as entry",
        )
        .warn_if(
            "output",
            joins && !config.output.is_empty() && looks_like_directory(&config.output),
            "JOIN_OUTPUT_DIRECTORY",
            "options.join is set, so output should be a single file (e.g. dist/app.js)",
        )
        .warn_if(
            "output",
            !joins && has_script_extension(&config.output),
            "SPLIT_OUTPUT_FILE",
            "options.join is not set, so output should be a directory (e.g. dist)",
        )
        .warn_if(
            "options",
            config.flag(CoffeeFlag::Map) && config.flag(CoffeeFlag::InlineMap),
            "MAP_CONFLICT",
            "Both map and inlineMap are set; the compiler embeds the map and skips the .map file",
        );

    for (index, plugin) in config.plugin_specs().iter().enumerate() {
        let field = format!("milkee.plugins[{}]", index);
        validator = validator
            .error_if(
                &field,
                plugin.name.trim().is_empty(),
                "PLUGIN_NAME",
                "Plugin name must not be empty",
            )
            .custom(&field, "PLUGIN_ARGS", || {
                plugin
                    .null_arg_path()
                    .map(|at| format!("{} is null; TOML cannot store it", at))
            });
    }

    validator.validate()
}

/// Check paths referenced by a configuration against the file system
///
/// Relative paths are resolved against `base`, normally the directory the
/// configuration file lives in.
pub fn validate_paths(config: &Config, base: &Path) -> ValidationResult {
    let mut result = validate_config(config);
    if config.entry.trim().is_empty() {
        return result;
    }

    let entry = base.join(&config.entry);
    let output = base.join(&config.output);

    let paths = Validator::new()
        .path_exists("entry", &entry)
        .warn_if(
            "output",
            config.joins() && output.is_dir(),
            "JOIN_OUTPUT_DIRECTORY",
            "options.join is set but output is an existing directory",
        )
        .warn_if(
            "output",
            !config.joins() && output.is_file(),
            "SPLIT_OUTPUT_FILE",
            "options.join is not set but output is an existing file",
        )
        .validate();

    result.merge(paths);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoffeeOptions, MilkeeConfig, PluginSpec};
    use tempfile::TempDir;

    fn joined(output: &str) -> Config {
        Config::new("src", output)
            .with_options(CoffeeOptions::default().with(CoffeeFlag::Join, true))
    }

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("entry", "  ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_minimal_config_valid() {
        let result = validate_config(&Config::new("src", "dist"));
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_blank_entry_invalid() {
        let result = validate_config(&Config::new("", "dist"));
        assert!(!result.is_valid());
        assert!(result.has_code("REQUIRED"));
        assert!(result.to_result().is_err());
    }

    #[test]
    fn test_same_path_invalid() {
        let result = validate_config(&Config::new("src", "src/"));
        assert!(result.has_code("SAME_PATH"));
    }

    #[test]
    fn test_join_with_directory_output_warns() {
        let result = validate_config(&joined("dist/"));
        assert!(result.is_valid());
        assert!(result.has_code("JOIN_OUTPUT_DIRECTORY"));

        let result = validate_config(&joined("dist/app.js"));
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_split_with_file_output_warns() {
        let result = validate_config(&Config::new("src", "dist/app.js"));
        assert!(result.is_valid());
        assert!(result.has_code("SPLIT_OUTPUT_FILE"));
    }

    #[test]
    fn test_map_conflict_warns() {
        let options = CoffeeOptions::default()
            .with(CoffeeFlag::Map, true)
            .with(CoffeeFlag::InlineMap, true);
        let result = validate_config(&Config::new("src", "dist").with_options(options));
        assert!(result.has_code("MAP_CONFLICT"));
    }

    #[test]
    fn test_blank_plugin_name_invalid() {
        let milkee = MilkeeConfig::default()
            .with_plugin(PluginSpec::new("log"))
            .with_plugin(PluginSpec::new(" "));
        let result = validate_config(&Config::new("src", "dist").with_milkee(milkee));

        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "milkee.plugins[1]");
    }

    #[test]
    fn test_validate_paths_missing_entry() {
        let dir = TempDir::new().unwrap();
        let result = validate_paths(&Config::new("src", "dist"), dir.path());
        assert!(result.has_code("PATH_NOT_FOUND"));
    }

    #[test]
    fn test_validate_paths_existing_entry() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();

        let result = validate_paths(&Config::new("src", "dist"), dir.path());
        assert!(result.is_valid());

        let result = validate_paths(&joined("dist"), dir.path());
        assert!(result.has_code("JOIN_OUTPUT_DIRECTORY"));
    }

    #[test]
    fn test_null_plugin_args_invalid() {
        let milkee = MilkeeConfig::default().with_plugin(PluginSpec::with_args(
            "manifest",
            serde_json::json!({ "path": null }),
        ));
        let result = validate_config(&Config::new("src", "dist").with_milkee(milkee));

        assert!(result.has_code("PLUGIN_ARGS"));
        assert!(result.errors()[0].message.contains("args.path"));
    }
}
