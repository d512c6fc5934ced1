//! Configuration file loading and saving

use super::schema::Config;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files searched for, in order, when no explicit path is given
pub const CONFIG_CANDIDATES: [&str; 3] = [
    "coffee.config.toml",
    "coffee.config.json",
    ".config/coffee.config.toml",
];

/// On-disk encoding of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `.json` is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a document in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => Self::from_toml_str(content),
            ConfigFormat::Json => Self::from_json_str(content),
        }
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Render as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render in the given format
    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Toml => self.to_toml_string(),
            ConfigFormat::Json => self.to_json_string(),
        }
    }

    /// Write to `path`, choosing the format from its extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(ConfigFormat::from_path(path))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(Error::from)
            .context(format!("Writing {}", path.display()))?;
        debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }
}

/// A configuration together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Parsed configuration
    pub config: Config,
    /// File it was read from
    pub path: PathBuf,
    /// Encoding of that file
    pub format: ConfigFormat,
}

impl LoadedConfig {
    /// Load from an explicit path, or discover a file in the current directory
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_file(p),
            None => Self::load_from_dir(&std::env::current_dir()?),
        }
    }

    /// Discover and load a configuration file inside `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = find_config_file(dir).ok_or_else(|| Error::config_not_found(dir))?;
        Self::load_file(&path)
    }

    /// Load a specific configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::file_not_found(path));
        }

        let format = ConfigFormat::from_path(path);
        let content = std::fs::read_to_string(path)
            .map_err(Error::from)
            .context(format!("Reading {}", path.display()))?;

        let config = Config::parse(&content, format)
            .context(format!("Parsing {}", path.display()))
            .with_suggestion("`entry` and `output` are required; every option must be true or false")?;

        debug!(path = %path.display(), ?format, "Configuration loaded");

        Ok(Self {
            config,
            path: path.to_path_buf(),
            format,
        })
    }

    /// Directory containing the configuration file
    ///
    /// Relative `entry` and `output` paths are resolved against it.
    pub fn base_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// `entry` resolved against the configuration's directory
    pub fn entry_path(&self) -> PathBuf {
        self.base_dir().join(&self.config.entry)
    }

    /// `output` resolved against the configuration's directory
    pub fn output_path(&self) -> PathBuf {
        self.base_dir().join(&self.config.output)
    }
}

/// Find a configuration file in `dir`
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.is_file())
}

/// Whether an error came from a malformed or incomplete document
pub fn is_parse_error(err: &Error) -> bool {
    err.code == ErrorCode::ConfigParseError
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoffeeFlag, CoffeeOptions, MilkeeConfig, MilkeeOptions, PluginSpec};
    use tempfile::TempDir;

    fn full_config() -> Config {
        Config::new("src", "dist/app.js")
            .with_options(
                CoffeeOptions::default()
                    .with(CoffeeFlag::Join, true)
                    .with(CoffeeFlag::Map, true)
                    .with(CoffeeFlag::Bare, false),
            )
            .with_milkee(
                MilkeeConfig::default()
                    .with_options(MilkeeOptions {
                        refresh: Some(true),
                        confirm: None,
                        copy: Some(false),
                    })
                    .with_plugin(PluginSpec::new("log"))
                    .with_plugin(PluginSpec::with_args(
                        "manifest",
                        serde_json::json!({ "path": "files.json", "pretty": true }),
                    )),
            )
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("coffee.config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("coffee.config.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("coffee.config")), ConfigFormat::Toml);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = full_config();
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_json_round_trip() {
        let config = full_config();
        let rendered = config.to_json_string().unwrap();
        assert!(rendered.contains("\"join\": true"));
        assert_eq!(Config::from_json_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_json_config_renders_as_toml() {
        let json = r#"{
            "entry": "src",
            "output": "dist",
            "milkee": {
                "plugins": [
                    "log",
                    { "name": "manifest", "args": { "path": "files.json", "extra": { "tags": ["a", "b"] } } }
                ]
            }
        }"#;
        let config = Config::from_json_str(json).unwrap();

        let rendered = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_null_plugin_arg_is_parse_error() {
        let json = r#"{
            "entry": "src",
            "output": "dist",
            "milkee": { "plugins": [{ "name": "manifest", "args": { "path": null } }] }
        }"#;

        let err = Config::from_json_str(json).unwrap_err();
        assert!(is_parse_error(&err));
        assert!(err.message.contains("args.path"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("coffee.config.toml");
        let config = full_config();

        config.save(&path).unwrap();
        let loaded = LoadedConfig::load(Some(&path)).unwrap();

        assert_eq!(loaded.config, config);
        assert_eq!(loaded.format, ConfigFormat::Toml);
        assert_eq!(loaded.base_dir(), dir.path());
        assert_eq!(loaded.entry_path(), dir.path().join("src"));
    }

    #[test]
    fn test_discovery_prefers_toml() {
        let dir = TempDir::new().unwrap();
        Config::new("from-json", "dist")
            .save(&dir.path().join("coffee.config.json"))
            .unwrap();
        Config::new("from-toml", "dist")
            .save(&dir.path().join("coffee.config.toml"))
            .unwrap();

        let loaded = LoadedConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.config.entry, "from-toml");
    }

    #[test]
    fn test_discovery_in_dot_config() {
        let dir = TempDir::new().unwrap();
        Config::new("src", "dist")
            .save(&dir.path().join(".config/coffee.config.toml"))
            .unwrap();

        let loaded = LoadedConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.config, Config::new("src", "dist"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let err = LoadedConfig::load_from_dir(dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = LoadedConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_incomplete_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("coffee.config.json");
        std::fs::write(&path, r#"{ "output": "dist" }"#).unwrap();

        let err = LoadedConfig::load_file(&path).unwrap_err();
        assert!(is_parse_error(&err));
        assert!(err.context.unwrap().contains("coffee.config.json"));
    }
}
