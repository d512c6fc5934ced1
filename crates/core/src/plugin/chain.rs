use super::PluginExecutor;
use crate::error::{Error, Result};
use crate::result::CompilationResult;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Ordered list of plugins run after a successful build
#[derive(Clone, Default)]
pub struct PluginChain {
    plugins: Vec<Arc<dyn PluginExecutor>>,
}

impl fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginChain")
            .field("plugins", &self.names())
            .finish()
    }
}

impl PluginChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin
    pub fn push(&mut self, plugin: Arc<dyn PluginExecutor>) {
        self.plugins.push(plugin);
    }

    /// Builder form of [`PluginChain::push`]
    pub fn with(mut self, plugin: Arc<dyn PluginExecutor>) -> Self {
        self.push(plugin);
        self
    }

    /// Number of plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Plugin names in invocation order
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every plugin against `result`, one at a time, in order
    ///
    /// The first failing plugin stops the chain; plugins after it are not
    /// invoked.
    pub async fn run(&self, result: &CompilationResult) -> Result<PluginReport> {
        let mut report = PluginReport::default();

        for (position, plugin) in self.plugins.iter().enumerate() {
            let name = plugin.name();
            debug!(plugin = name, position, "Running plugin");

            let started = Instant::now();
            if let Err(err) = plugin.handle(result).await {
                warn!(plugin = name, position, error = %err.message, "Plugin failed");
                return Err(Error::plugin_failed(name, position, err));
            }

            report.runs.push(PluginRun {
                name: name.to_string(),
                duration: started.elapsed(),
            });
        }

        info!(
            plugins = report.runs.len(),
            duration_ms = report.total_duration().as_millis() as u64,
            "Plugins finished"
        );

        Ok(report)
    }
}

impl FromIterator<Arc<dyn PluginExecutor>> for PluginChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn PluginExecutor>>>(iter: I) -> Self {
        Self {
            plugins: iter.into_iter().collect(),
        }
    }
}

/// One completed plugin invocation
#[derive(Debug, Clone)]
pub struct PluginRun {
    /// Plugin name
    pub name: String,
    /// Time until its future completed
    pub duration: Duration,
}

/// Plugins that ran, in the order they ran
#[derive(Debug, Clone, Default)]
pub struct PluginReport {
    /// Invocations in order
    pub runs: Vec<PluginRun>,
}

impl PluginReport {
    /// Sum of all plugin durations
    pub fn total_duration(&self) -> Duration {
        self.runs.iter().map(|r| r.duration).sum()
    }
}
