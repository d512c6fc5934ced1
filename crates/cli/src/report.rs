//! Rendering of configurations and validation results

use crate::output::{format_count, format_flag, Status};
use milkee_core::config::{CoffeeFlag, LoadedConfig};
use milkee_core::validation::{ValidationError, ValidationResult};

fn describe(issue: &ValidationError) -> String {
    format!("{} [{}]", issue, issue.code)
}

/// One line per validation issue, errors first
pub fn validation_lines(result: &ValidationResult) -> Vec<String> {
    result
        .errors()
        .iter()
        .map(|e| format!("error: {}", describe(e)))
        .chain(
            result
                .warnings()
                .iter()
                .map(|w| format!("warning: {}", describe(w))),
        )
        .collect()
}

/// Print a validation result with a closing summary line
pub fn print_validation(result: &ValidationResult) {
    for error in result.errors() {
        Status::error(&describe(error));
    }
    for warning in result.warnings() {
        Status::warning(&describe(warning));
    }

    if result.is_valid() {
        Status::success(&format!(
            "Configuration is valid ({})",
            format_count(result.warnings().len(), "warning", "warnings")
        ));
    } else {
        Status::error(&format!(
            "Configuration is invalid ({})",
            format_count(result.errors().len(), "error", "errors")
        ));
    }
}

/// Print a human-readable overview of a loaded configuration
pub fn print_summary(loaded: &LoadedConfig) {
    let config = &loaded.config;

    Status::header(&format!("{}", loaded.path.display()));
    Status::detail("entry", &config.entry);
    Status::detail("output", &format!("{} ({})", config.output, config.output_layout()));

    let options = config.coffee_options();
    let flags: Vec<String> = CoffeeFlag::ALL
        .iter()
        .filter_map(|flag| {
            options
                .get(*flag)
                .map(|value| format!("{}={}", flag, format_flag(Some(value))))
        })
        .collect();
    Status::detail("flags", &if flags.is_empty() { "none".to_string() } else { flags.join(" ") });

    let milkee = config.milkee_options();
    Status::detail(
        "builder",
        &format!(
            "refresh={} confirm={} copy={}",
            format_flag(milkee.refresh),
            format_flag(milkee.confirm),
            format_flag(milkee.copy)
        ),
    );

    let plugins: Vec<&str> = config.plugin_specs().iter().map(|p| p.name.as_str()).collect();
    Status::detail(
        "plugins",
        &if plugins.is_empty() { "none".to_string() } else { plugins.join(" → ") },
    );
}
