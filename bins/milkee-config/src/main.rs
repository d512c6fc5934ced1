//! milkee-config - inspect, validate and scaffold Milkee configuration
//!
//! Works on `coffee.config.toml` / `coffee.config.json` files and drives
//! the post-build plugin chain for a recorded build result.

use clap::{Parser, Subcommand, ValueEnum};
use milkee_core::config::ConfigFormat;
use milkee_core::error::exit_codes;
use milkee_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

/// Inspect, validate and scaffold Milkee coffee.config files
#[derive(Parser)]
#[command(name = "milkee-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (searched for in the current directory if omitted)
    #[arg(short, long, global = true, env = "MILKEE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration
    Check {
        /// Skip checks against the file system
        #[arg(long)]
        no_fs: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Toml)]
        format: Format,

        /// Print a human-readable summary instead
        #[arg(short, long, conflicts_with = "format")]
        summary: bool,
    },

    /// Write a starter configuration file
    Init {
        /// Source file or directory
        #[arg(long, default_value = "src")]
        entry: String,

        /// Output directory, or output file with --join
        #[arg(long)]
        output: Option<String>,

        /// Join all sources into a single output file
        #[arg(long)]
        join: bool,

        /// File format (default: from the --config extension, else toml)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the coffee compiler arguments for the configuration
    Args {
        /// Print one argument per line
        #[arg(long)]
        lines: bool,
    },

    /// List configured plugins
    Plugins,

    /// Run the configured plugins against a recorded build result
    RunPlugins {
        /// JSON file holding a CompilationResult
        result: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
}

impl From<Format> for ConfigFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Toml => ConfigFormat::Toml,
            Format::Json => ConfigFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = milkee_telemetry::init_with_config(TelemetryConfig::for_verbosity(cli.verbose)) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Check { no_fs, json } => commands::check::run(config, !no_fs, json),
        Commands::Show { format, summary } => commands::show::run(config, format.into(), summary),
        Commands::Init {
            entry,
            output,
            join,
            format,
            force,
        } => commands::init::run(config, &entry, output.as_deref(), join, format.map(Into::into), force),
        Commands::Args { lines } => commands::args::run(config, lines),
        Commands::Plugins => commands::plugins::run(config),
        Commands::RunPlugins { result } => commands::run_plugins::run(&result).await,
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            let code = e
                .downcast_ref::<milkee_core::Error>()
                .map_or(exit_codes::FAILURE, milkee_core::Error::exit_code);
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(code as u8)
        }
    }
}
