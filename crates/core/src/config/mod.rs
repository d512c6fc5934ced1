//! Configuration loading and schema definitions
//!
//! The `coffee.config` contract consumed by the Milkee build tool.

mod loader;
mod schema;

pub use loader::{find_config_file, is_parse_error, ConfigFormat, LoadedConfig, CONFIG_CANDIDATES};
pub use schema::*;
