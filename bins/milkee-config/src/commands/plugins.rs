//! Plugins command - list configured plugins

use anyhow::Result;
use milkee_cli::output::{format_count, Status};
use milkee_core::error::exit_codes;
use milkee_core::plugin::PluginRegistry;
use std::path::Path;

/// List plugins in invocation order and flag the ones no factory is registered for
pub fn run(config: Option<&Path>) -> Result<i32> {
    let loaded = super::load(config)?;
    let registry = PluginRegistry::with_builtins();
    let plugins = loaded.config.plugin_specs();

    if plugins.is_empty() {
        Status::info("No plugins configured");
        return Ok(exit_codes::SUCCESS);
    }

    let mut unknown = 0;
    for (index, plugin) in plugins.iter().enumerate() {
        let line = if plugin.args.is_null() {
            format!("{}. {}", index + 1, plugin.name)
        } else {
            format!("{}. {} {}", index + 1, plugin.name, plugin.args)
        };

        if registry.contains(&plugin.name) {
            Status::success(&line);
        } else {
            unknown += 1;
            Status::warning(&format!("{} (not built in)", line));
        }
    }

    if unknown > 0 {
        Status::info(&format!(
            "{} must be provided by the build host",
            format_count(unknown, "plugin", "plugins")
        ));
    }

    Ok(exit_codes::SUCCESS)
}
