//! Core types for the Milkee CoffeeScript build tool
//!
//! This crate defines the configuration contract between Milkee and its
//! users and plugins:
//!
//! - **Configuration**: the `coffee.config` schema with TOML and JSON loading
//! - **Validation**: checks for the contracts the types cannot express
//! - **Build results**: what a plugin receives after a successful build
//! - **Plugins**: the executor contract, a registry and an ordered chain
//! - **Error handling**: structured errors with codes and recovery suggestions
//!
//! # Example
//!
//! ```rust,no_run
//! use milkee_core::config::LoadedConfig;
//! use milkee_core::validation::validate_config;
//!
//! let loaded = LoadedConfig::load(None).expect("No coffee.config found");
//! let report = validate_config(&loaded.config);
//!
//! for warning in report.warnings() {
//!     eprintln!("warning: {}", warning);
//! }
//! println!("coffee {}", loaded.config.compiler_args().join(" "));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod plugin;
pub mod result;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        CoffeeFlag, CoffeeOptions, Config, LoadedConfig, MilkeeConfig, MilkeeOptions,
        OutputLayout, PluginSpec,
    };
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::plugin::{plugin_fn, PluginChain, PluginExecutor, PluginRegistry};
    pub use crate::result::{CompilationResult, WATCH_MODE_STDOUT};
    pub use crate::validation::{validate_config, ValidationResult, Validator};
}
