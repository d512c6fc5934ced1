//! Args command - print the coffee invocation for a configuration

use anyhow::Result;
use milkee_core::error::exit_codes;
use std::path::Path;

pub fn run(config: Option<&Path>, lines: bool) -> Result<i32> {
    let loaded = super::load(config)?;
    let args = loaded.config.expand_paths()?.compiler_args();

    if lines {
        for arg in &args {
            println!("{}", arg);
        }
    } else {
        println!("coffee {}", args.join(" "));
    }

    Ok(exit_codes::SUCCESS)
}
