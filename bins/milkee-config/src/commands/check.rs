//! Check command - validate a configuration

use anyhow::Result;
use milkee_cli::report;
use milkee_core::error::exit_codes;
use milkee_core::validation::{validate_config, validate_paths};
use std::path::Path;

/// Validate the configuration and report problems
pub fn run(config: Option<&Path>, check_fs: bool, json: bool) -> Result<i32> {
    let loaded = match super::load(config) {
        Ok(loaded) => loaded,
        Err(err) if json => {
            println!("{}", serde_json::to_string_pretty(&err.to_report())?);
            return Ok(err.exit_code());
        }
        Err(err) => return Err(err.into()),
    };

    let result = if check_fs {
        validate_paths(&loaded.config, loaded.base_dir())
    } else {
        validate_config(&loaded.config)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::print_validation(&result);
    }

    Ok(if result.is_valid() {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_ERROR
    })
}
