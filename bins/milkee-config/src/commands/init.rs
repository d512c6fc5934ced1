//! Init command - scaffold a configuration file

use anyhow::Result;
use milkee_cli::output::Status;
use milkee_core::config::{CoffeeFlag, CoffeeOptions, Config, ConfigFormat, MilkeeConfig, MilkeeOptions};
use milkee_core::error::{exit_codes, Error, ErrorCode};
use milkee_core::validation::validate_config;
use std::path::{Path, PathBuf};

/// Build the starter configuration
pub fn starter_config(entry: &str, output: Option<&str>, join: bool) -> Config {
    let output = output.unwrap_or(if join { "dist/app.js" } else { "dist" });

    Config::new(entry, output)
        .with_options(
            CoffeeOptions::default()
                .with(CoffeeFlag::Bare, false)
                .with(CoffeeFlag::Join, join)
                .with(CoffeeFlag::Map, false),
        )
        .with_milkee(MilkeeConfig::default().with_options(MilkeeOptions {
            refresh: Some(false),
            confirm: Some(false),
            copy: Some(false),
        }))
}

/// File to write; the format always follows the extension of an explicit path
fn target_path(config: Option<&Path>, format: Option<ConfigFormat>) -> milkee_core::Result<PathBuf> {
    match (config, format) {
        (Some(path), Some(format)) if ConfigFormat::from_path(path) != format => Err(Error::new(
            ErrorCode::InvalidInput,
            format!("--format {:?} does not match {}", format, path.display()),
        )
        .with_suggestion("Drop --format or give the file a matching extension")),
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(ConfigFormat::Json)) => Ok(PathBuf::from("coffee.config.json")),
        (None, _) => Ok(PathBuf::from("coffee.config.toml")),
    }
}

pub fn run(
    config: Option<&Path>,
    entry: &str,
    output: Option<&str>,
    join: bool,
    format: Option<ConfigFormat>,
    force: bool,
) -> Result<i32> {
    let path = target_path(config, format)?;
    if path.exists() && !force {
        return Err(Error::already_exists(&path).into());
    }

    let starter = starter_config(entry, output, join);
    for warning in validate_config(&starter).warnings() {
        Status::warning(&warning.to_string());
    }

    starter.save(&path)?;
    Status::success(&format!("Created {}", path.display()));

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use milkee_core::config::OutputLayout;

    #[test]
    fn test_starter_defaults() {
        let config = starter_config("src", None, false);
        assert_eq!(config.output, "dist");
        assert_eq!(config.output_layout(), OutputLayout::Directory);
        assert!(validate_config(&config).warnings().is_empty());
    }

    #[test]
    fn test_starter_join() {
        let config = starter_config("src", None, true);
        assert_eq!(config.output, "dist/app.js");
        assert!(config.joins());
        assert!(validate_config(&config).warnings().is_empty());
    }

    #[test]
    fn test_target_path() {
        assert_eq!(target_path(None, None).unwrap(), PathBuf::from("coffee.config.toml"));
        assert_eq!(
            target_path(None, Some(ConfigFormat::Json)).unwrap(),
            PathBuf::from("coffee.config.json")
        );
        assert_eq!(
            target_path(Some(Path::new("conf/app.json")), None).unwrap(),
            PathBuf::from("conf/app.json")
        );
        assert_eq!(
            target_path(Some(Path::new("conf/app.toml")), Some(ConfigFormat::Toml)).unwrap(),
            PathBuf::from("conf/app.toml")
        );
    }

    #[test]
    fn test_target_path_format_mismatch() {
        let err = target_path(Some(Path::new("conf/app.toml")), Some(ConfigFormat::Json)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.suggestion.is_some());
    }
}
