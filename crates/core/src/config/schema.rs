//! Configuration schema definitions
//!
//! The shape of a `coffee.config` file: entry point, output target,
//! CoffeeScript compiler flags and Milkee builder options. Keys are
//! camelCase on disk (`inlineMap`, `noHeader`) to match the files the
//! JavaScript tooling reads.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Source file or directory to compile
    pub entry: String,

    /// Output file (when joining) or directory
    pub output: String,

    /// CoffeeScript compiler flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CoffeeOptions>,

    /// Milkee builder options and plugins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milkee: Option<MilkeeConfig>,
}

impl Config {
    /// Create a configuration with only the required fields
    pub fn new(entry: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            output: output.into(),
            options: None,
            milkee: None,
        }
    }

    /// Set compiler flags
    pub fn with_options(mut self, options: CoffeeOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set builder options and plugins
    pub fn with_milkee(mut self, milkee: MilkeeConfig) -> Self {
        self.milkee = Some(milkee);
        self
    }

    /// Compiler flags, with absent flags off
    pub fn coffee_options(&self) -> CoffeeOptions {
        self.options.unwrap_or_default()
    }

    /// Builder options, with absent options off
    pub fn milkee_options(&self) -> MilkeeOptions {
        self.milkee
            .as_ref()
            .and_then(|m| m.options)
            .unwrap_or_default()
    }

    /// Whether a compiler flag is switched on
    pub fn flag(&self, flag: CoffeeFlag) -> bool {
        self.coffee_options().is_enabled(flag)
    }

    /// Whether all inputs are joined into a single output file
    pub fn joins(&self) -> bool {
        self.flag(CoffeeFlag::Join)
    }

    /// Whether the compiler runs in watch mode
    pub fn watches(&self) -> bool {
        self.flag(CoffeeFlag::Watch)
    }

    /// How `output` is meant to be interpreted
    pub fn output_layout(&self) -> OutputLayout {
        if self.joins() {
            OutputLayout::SingleFile
        } else {
            OutputLayout::Directory
        }
    }

    /// Plugins in invocation order
    pub fn plugin_specs(&self) -> &[PluginSpec] {
        self.milkee
            .as_ref()
            .and_then(|m| m.plugins.as_deref())
            .unwrap_or(&[])
    }

    /// Arguments for the `coffee` executable that compile this configuration
    ///
    /// Flags come in a fixed order regardless of how they were written in
    /// the file, so the rendered command is stable.
    pub fn compiler_args(&self) -> Vec<String> {
        let mut args = vec!["--compile".to_string()];
        args.extend(
            self.coffee_options()
                .enabled_flags()
                .into_iter()
                .map(|flag| flag.cli_flag().to_string()),
        );
        args.push("--output".to_string());
        args.push(self.output.clone());
        args.push(self.entry.clone());
        args
    }

    /// Expand `~` and environment variables in `entry` and `output`
    pub fn expand_paths(&self) -> Result<Self> {
        let expand = |field: &str, value: &str| -> Result<String> {
            shellexpand::full(value)
                .map(|expanded| expanded.into_owned())
                .map_err(|e| Error::config(format!("Cannot expand {}: {}", field, e)))
        };

        Ok(Self {
            entry: expand("entry", &self.entry)?,
            output: expand("output", &self.output)?,
            ..self.clone()
        })
    }

    /// Whether `output` points at the same location as `entry`
    ///
    /// Compares lexically: `.` components and trailing separators are
    /// ignored, symlinks and `..` are not resolved.
    pub fn output_overlaps_entry(&self) -> bool {
        let normalize = |p: &str| -> PathBuf {
            Path::new(p)
                .components()
                .filter(|c| !matches!(c, Component::CurDir))
                .collect()
        };
        normalize(&self.entry) == normalize(&self.output)
    }
}

/// How the compiler lays out its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// Every input concatenated into one file
    SingleFile,
    /// One output file per input
    Directory,
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputLayout::SingleFile => write!(f, "single file"),
            OutputLayout::Directory => write!(f, "directory"),
        }
    }
}

/// A CoffeeScript compiler flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoffeeFlag {
    /// `bare`
    Bare,
    /// `join`
    Join,
    /// `map`
    Map,
    /// `inlineMap`
    InlineMap,
    /// `noHeader`
    NoHeader,
    /// `transpile`
    Transpile,
    /// `literate`
    Literate,
    /// `watch`
    Watch,
}

impl CoffeeFlag {
    /// Every flag, in the order the compiler arguments are rendered
    pub const ALL: [CoffeeFlag; 8] = [
        CoffeeFlag::Bare,
        CoffeeFlag::Join,
        CoffeeFlag::Map,
        CoffeeFlag::InlineMap,
        CoffeeFlag::NoHeader,
        CoffeeFlag::Transpile,
        CoffeeFlag::Literate,
        CoffeeFlag::Watch,
    ];

    /// Key used in configuration files
    pub fn key(&self) -> &'static str {
        match self {
            CoffeeFlag::Bare => "bare",
            CoffeeFlag::Join => "join",
            CoffeeFlag::Map => "map",
            CoffeeFlag::InlineMap => "inlineMap",
            CoffeeFlag::NoHeader => "noHeader",
            CoffeeFlag::Transpile => "transpile",
            CoffeeFlag::Literate => "literate",
            CoffeeFlag::Watch => "watch",
        }
    }

    /// Long option understood by `coffee`
    pub fn cli_flag(&self) -> &'static str {
        match self {
            CoffeeFlag::Bare => "--bare",
            CoffeeFlag::Join => "--join",
            CoffeeFlag::Map => "--map",
            CoffeeFlag::InlineMap => "--inline-map",
            CoffeeFlag::NoHeader => "--no-header",
            CoffeeFlag::Transpile => "--transpile",
            CoffeeFlag::Literate => "--literate",
            CoffeeFlag::Watch => "--watch",
        }
    }
}

impl fmt::Display for CoffeeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// CoffeeScript compiler flags
///
/// Each flag is independently optional. An absent flag and an explicit
/// `false` both leave the behaviour off; the distinction is kept so a
/// loaded file saves back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CoffeeOptions {
    /// Compile without the top-level function safety wrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bare: Option<bool>,

    /// Concatenate all sources before compiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<bool>,

    /// Generate source maps next to the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<bool>,

    /// Embed source maps in the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_map: Option<bool>,

    /// Suppress the "Generated by CoffeeScript" header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_header: Option<bool>,

    /// Pipe the output through Babel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transpile: Option<bool>,

    /// Treat sources as literate CoffeeScript
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literate: Option<bool>,

    /// Recompile on source changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,
}

impl CoffeeOptions {
    fn slot(&self, flag: CoffeeFlag) -> &Option<bool> {
        match flag {
            CoffeeFlag::Bare => &self.bare,
            CoffeeFlag::Join => &self.join,
            CoffeeFlag::Map => &self.map,
            CoffeeFlag::InlineMap => &self.inline_map,
            CoffeeFlag::NoHeader => &self.no_header,
            CoffeeFlag::Transpile => &self.transpile,
            CoffeeFlag::Literate => &self.literate,
            CoffeeFlag::Watch => &self.watch,
        }
    }

    fn slot_mut(&mut self, flag: CoffeeFlag) -> &mut Option<bool> {
        match flag {
            CoffeeFlag::Bare => &mut self.bare,
            CoffeeFlag::Join => &mut self.join,
            CoffeeFlag::Map => &mut self.map,
            CoffeeFlag::InlineMap => &mut self.inline_map,
            CoffeeFlag::NoHeader => &mut self.no_header,
            CoffeeFlag::Transpile => &mut self.transpile,
            CoffeeFlag::Literate => &mut self.literate,
            CoffeeFlag::Watch => &mut self.watch,
        }
    }

    /// The value as written, `None` when the key is absent
    pub fn get(&self, flag: CoffeeFlag) -> Option<bool> {
        *self.slot(flag)
    }

    /// Whether the flag is switched on
    pub fn is_enabled(&self, flag: CoffeeFlag) -> bool {
        self.get(flag).unwrap_or(false)
    }

    /// Set a flag explicitly
    pub fn set(&mut self, flag: CoffeeFlag, value: bool) {
        *self.slot_mut(flag) = Some(value);
    }

    /// Builder form of [`CoffeeOptions::set`]
    pub fn with(mut self, flag: CoffeeFlag, value: bool) -> Self {
        self.set(flag, value);
        self
    }

    /// Switched-on flags in rendering order
    pub fn enabled_flags(&self) -> Vec<CoffeeFlag> {
        CoffeeFlag::ALL
            .into_iter()
            .filter(|flag| self.is_enabled(*flag))
            .collect()
    }
}

/// Milkee builder configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MilkeeConfig {
    /// Builder behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<MilkeeOptions>,

    /// Plugins run after a successful build, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginSpec>>,
}

impl MilkeeConfig {
    /// Append a plugin to the end of the list
    pub fn with_plugin(mut self, plugin: PluginSpec) -> Self {
        self.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    /// Set builder behaviour
    pub fn with_options(mut self, options: MilkeeOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Milkee builder behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MilkeeOptions {
    /// Clear the output directory before compiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<bool>,

    /// Ask for confirmation before compiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm: Option<bool>,

    /// Copy non-CoffeeScript assets into the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<bool>,
}

impl MilkeeOptions {
    /// `refresh`, absent meaning off
    pub fn should_refresh(&self) -> bool {
        self.refresh.unwrap_or(false)
    }

    /// `confirm`, absent meaning off
    pub fn should_confirm(&self) -> bool {
        self.confirm.unwrap_or(false)
    }

    /// `copy`, absent meaning off
    pub fn should_copy(&self) -> bool {
        self.copy.unwrap_or(false)
    }
}

/// A plugin reference as written in a configuration file
///
/// Either a bare name (`"log"`) or a table with a name and setup
/// arguments (`{ name = "manifest", args = { path = "files.json" } }`).
/// `null` is rejected anywhere inside `args` since TOML has no way to
/// write it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PluginSpecRepr")]
pub struct PluginSpec {
    /// Name the plugin is registered under
    pub name: String,

    /// Arguments passed to the plugin's setup function
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub args: serde_json::Value,
}

impl PluginSpec {
    /// Reference a plugin without setup arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: serde_json::Value::Null,
        }
    }

    /// Reference a plugin with setup arguments
    pub fn with_args(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Location of the first `null` nested inside `args`, such as
    /// `args.path` or `args.files[2]`
    ///
    /// A top-level `null` means "no arguments" and is not reported.
    pub fn null_arg_path(&self) -> Option<String> {
        if self.args.is_null() {
            return None;
        }
        null_path(&self.args).map(|at| format!("args{}", at))
    }
}

fn null_path(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null => Some(String::new()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| null_path(item).map(|rest| format!("[{}]{}", i, rest))),
        Value::Object(map) => map
            .iter()
            .find_map(|(key, item)| null_path(item).map(|rest| format!(".{}{}", key, rest))),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginTable {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PluginSpecRepr {
    Name(String),
    Table(PluginTable),
}

impl TryFrom<PluginSpecRepr> for PluginSpec {
    type Error = String;

    fn try_from(repr: PluginSpecRepr) -> std::result::Result<Self, Self::Error> {
        let spec = match repr {
            PluginSpecRepr::Name(name) => PluginSpec::new(name),
            PluginSpecRepr::Table(PluginTable { name, args }) => PluginSpec { name, args },
        };

        match spec.null_arg_path() {
            Some(at) => Err(format!(
                "plugin '{}' has null at {}; give a value or leave the key out",
                spec.name, at
            )),
            None => Ok(spec),
        }
    }
}
