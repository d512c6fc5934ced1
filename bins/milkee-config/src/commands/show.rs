//! Show command - print the normalized configuration

use anyhow::Result;
use milkee_cli::report;
use milkee_core::config::ConfigFormat;
use milkee_core::error::exit_codes;
use std::path::Path;

pub fn run(config: Option<&Path>, format: ConfigFormat, summary: bool) -> Result<i32> {
    let loaded = super::load(config)?;

    if summary {
        report::print_summary(&loaded);
    } else {
        print!("{}", loaded.config.render(format)?);
        if format == ConfigFormat::Json {
            println!();
        }
    }

    Ok(exit_codes::SUCCESS)
}
