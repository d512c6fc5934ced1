//! Plugins shipped with the toolkit

use super::PluginExecutor;
use crate::config::OutputLayout;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use crate::result::CompilationResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// File name used by [`ManifestPlugin`] when no path is configured
pub const DEFAULT_MANIFEST_FILE: &str = "milkee-manifest.json";

/// Logs a summary of each build
#[derive(Debug, Default)]
pub struct LogPlugin;

impl LogPlugin {
    /// Registered name
    pub const NAME: &'static str = "log";

    /// Factory registered under [`LogPlugin::NAME`]; takes no arguments
    pub fn setup(_args: &serde_json::Value) -> Result<Arc<dyn PluginExecutor>> {
        Ok(Arc::new(LogPlugin))
    }
}

#[async_trait]
impl PluginExecutor for LogPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn handle(&self, result: &CompilationResult) -> Result<()> {
        info!(
            entry = %result.config.entry,
            output = %result.config.output,
            files = result.compiled_files.len(),
            source_maps = result.source_maps().count(),
            watch = result.is_watch_placeholder(),
            "Build finished"
        );

        if !result.stderr.trim().is_empty() {
            warn!(stderr = %result.stderr.trim(), "Compiler reported diagnostics");
        }

        Ok(())
    }
}

/// Arguments accepted by the `manifest` plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestArgs {
    /// Where to write the manifest; relative paths land in the output directory
    pub path: Option<PathBuf>,
    /// Pretty-print the JSON
    pub pretty: bool,
}

/// Writes the list of emitted files to a JSON manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestPlugin {
    args: ManifestArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    entry: &'a str,
    output: &'a str,
    watch: bool,
    files: &'a [PathBuf],
}

impl ManifestPlugin {
    /// Registered name
    pub const NAME: &'static str = "manifest";

    /// Plugin with already parsed arguments
    pub fn new(args: ManifestArgs) -> Self {
        Self { args }
    }

    /// Factory registered under [`ManifestPlugin::NAME`]
    pub fn setup(args: &serde_json::Value) -> Result<Arc<dyn PluginExecutor>> {
        let args = if args.is_null() {
            ManifestArgs::default()
        } else {
            serde_json::from_value(args.clone()).map_err(|e| {
                Error::new(ErrorCode::InvalidInput, format!("Invalid manifest arguments: {}", e))
            })?
        };
        Ok(Arc::new(Self::new(args)))
    }

    /// Where the manifest for `result` is written
    pub fn manifest_path(&self, result: &CompilationResult) -> PathBuf {
        let output = Path::new(&result.config.output);
        let dir = match result.config.output_layout() {
            OutputLayout::Directory => output,
            OutputLayout::SingleFile => output.parent().unwrap_or_else(|| Path::new("")),
        };

        match &self.args.path {
            Some(path) => dir.join(path),
            None => dir.join(DEFAULT_MANIFEST_FILE),
        }
    }
}

#[async_trait]
impl PluginExecutor for ManifestPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn handle(&self, result: &CompilationResult) -> Result<()> {
        let manifest = Manifest {
            entry: &result.config.entry,
            output: &result.config.output,
            watch: result.is_watch_placeholder(),
            files: &result.compiled_files,
        };
        let content = if self.args.pretty {
            serde_json::to_string_pretty(&manifest)?
        } else {
            serde_json::to_string(&manifest)?
        };

        let path = self.manifest_path(result);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(Error::from)
            .context(format!("Writing manifest {}", path.display()))?;

        info!(path = %path.display(), files = result.compiled_files.len(), "Manifest written");
        Ok(())
    }
}
