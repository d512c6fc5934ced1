//! Run-plugins command - replay a build result through the plugin chain

use anyhow::{Context, Result};
use milkee_cli::output::{format_count, format_duration, Status};
use milkee_cli::progress;
use milkee_core::error::exit_codes;
use milkee_core::plugin::PluginRegistry;
use milkee_core::result::CompilationResult;
use milkee_telemetry::{Event, Timer};
use std::path::Path;

/// Run the plugins listed in the result's configuration, in order
pub async fn run(result_path: &Path) -> Result<i32> {
    let content = std::fs::read_to_string(result_path)
        .with_context(|| format!("Failed to read {}", result_path.display()))?;
    let result: CompilationResult = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid build result", result_path.display()))?;

    let chain = PluginRegistry::with_builtins().resolve_config(&result.config)?;
    if chain.is_empty() {
        Status::info("No plugins configured");
        return Ok(exit_codes::SUCCESS);
    }

    let timer = Timer::start("run-plugins");
    let spinner = progress::spinner(&format!(
        "Running {}",
        format_count(chain.len(), "plugin", "plugins")
    ));

    let report = match chain.run(&result).await {
        Ok(report) => report,
        Err(e) => {
            progress::finish_error(&spinner);
            return Err(e.into());
        }
    };
    let elapsed = timer.stop();
    progress::finish_success(&spinner, "Plugins finished");

    for run in &report.runs {
        Status::success(&format!("{} ({})", run.name, format_duration(run.duration)));
    }
    Status::info(&format!(
        "{} in {}",
        format_count(report.runs.len(), "plugin", "plugins"),
        format_duration(elapsed)
    ));

    Event::new(
        "plugins.completed",
        serde_json::json!({
            "plugins": report.runs.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "files": result.compiled_files.len(),
        }),
    )
    .log();

    Ok(exit_codes::SUCCESS)
}
