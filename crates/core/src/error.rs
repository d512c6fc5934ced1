//! Structured error handling with context and recovery suggestions
//!
//! Every failure in the toolkit is an [`Error`] carrying:
//! - An [`ErrorCode`] for programmatic handling
//! - Optional context and a recovery suggestion
//! - The underlying source error, when there is one

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // IO errors (2xxx)
    /// Any other IO failure
    IoError = 2000,
    /// A file or directory is missing
    FileNotFound = 2001,
    /// Access denied by the OS
    PermissionDenied = 2002,
    /// Refused to overwrite an existing file
    AlreadyExists = 2003,

    // Configuration errors (3xxx)
    /// Configuration is unusable
    ConfigError = 3000,
    /// No configuration file could be found
    ConfigNotFound = 3001,
    /// Configuration file is malformed
    ConfigParseError = 3002,
    /// Configuration could not be rendered
    ConfigSerializeError = 3003,

    // Validation errors (4xxx)
    /// Configuration breaks a contract
    ValidationError = 4000,
    /// Arguments given to a command or plugin are wrong
    InvalidInput = 4001,

    // Plugin errors (5xxx)
    /// No plugin registered under the name
    PluginNotFound = 5001,
    /// A plugin's setup function failed
    PluginSetupFailed = 5002,
    /// A plugin failed while handling a result
    PluginFailed = 5003,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            4 => "Validation",
            5 => "Plugin",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// Map this error onto a CLI exit code
    pub fn exit_code(&self) -> i32 {
        match self.code.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            4 => exit_codes::VALIDATION_ERROR,
            5 => exit_codes::PLUGIN_ERROR,
            _ => exit_codes::FAILURE,
        }
    }

    // Convenience constructors

    /// Missing file, with a suggestion
    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    /// Refusal to overwrite `path`
    pub fn already_exists(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::AlreadyExists,
            format!("File already exists: {}", path.as_ref().display()),
        )
        .with_suggestion("Pass --force to overwrite it")
    }

    /// Generic configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Discovery found no configuration in `dir`
    pub fn config_not_found(dir: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("No coffee.config file found in {}", dir.as_ref().display()),
        )
        .with_suggestion("Run `milkee-config init` or use --config to specify a path")
    }

    /// Failed validation
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// No factory registered under `name`
    pub fn plugin_not_found(name: &str) -> Self {
        Self::new(ErrorCode::PluginNotFound, format!("Unknown plugin: {}", name))
            .with_suggestion("Register the plugin with the host before resolving the configuration")
    }

    /// A factory rejected its arguments
    pub fn plugin_setup(name: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PluginSetupFailed,
            format!("Plugin '{}' could not be set up: {}", name, message.into()),
        )
    }

    /// Plugin at zero-based `position` failed with `cause`
    pub fn plugin_failed(name: &str, position: usize, cause: Error) -> Self {
        Self::new(
            ErrorCode::PluginFailed,
            format!("Plugin '{}' (#{}) failed: {}", name, position + 1, cause.message),
        )
        .with_source(cause)
    }
}

/// Serializable error report for machine-readable output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Code as displayed, e.g. `E3001`
    pub code_str: String,
    /// Category of the code
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source error, rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command succeeded
    pub const SUCCESS: i32 = 0;
    /// Any failure without a more specific code
    pub const FAILURE: i32 = 1;
    /// Configuration failed validation
    pub const VALIDATION_ERROR: i32 = 2;
    /// Configuration missing or unreadable
    pub const CONFIG_ERROR: i32 = 3;
    /// Plugin unknown, or failed during setup or handling
    pub const PLUGIN_ERROR: i32 = 4;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => ErrorCode::AlreadyExists,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let code = if err.is_io() {
            ErrorCode::IoError
        } else {
            ErrorCode::ConfigParseError
        };
        Error::new(code, format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err.message()))
            .with_source(err)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::new(ErrorCode::ConfigSerializeError, format!("TOML serialize error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::PluginFailed.to_string(), "E5003");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ConfigParseError.category(), "Configuration");
        assert_eq!(ErrorCode::PluginNotFound.category(), "Plugin");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::file_not_found("/path/to/file")
            .with_context("While loading configuration");

        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::plugin_not_found("minify").with_context("Resolving milkee.plugins");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E5001"));
        assert!(json.contains("Plugin"));
        assert!(json.contains("minify"));
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(Error::config("bad").exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(Error::validation("bad").exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(Error::plugin_not_found("x").exit_code(), exit_codes::PLUGIN_ERROR);
        assert_eq!(Error::new(ErrorCode::IoError, "bad").exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_plugin_failed_keeps_source() {
        let cause = Error::new(ErrorCode::IoError, "disk full");
        let err = Error::plugin_failed("manifest", 1, cause);

        assert_eq!(err.code, ErrorCode::PluginFailed);
        assert!(err.message.contains("#2"));
        assert!(err.source.is_some());
    }
}
