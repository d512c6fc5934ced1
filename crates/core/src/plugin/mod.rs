//! Plugin contract between a build host and post-build plugins
//!
//! A plugin is set up once from its configuration entry and then handed the
//! [`CompilationResult`] of every successful build:
//!
//! - [`PluginFactory`] turns the `args` of a [`PluginSpec`] into an executor
//! - [`PluginExecutor`] handles a build result; the returned future
//!   completing is the "done" signal
//! - [`PluginRegistry`] maps plugin names to factories
//! - [`PluginChain`] runs executors strictly in configuration order, waiting
//!   for each one before starting the next
//!
//! # Example
//!
//! ```rust
//! use milkee_core::config::Config;
//! use milkee_core::plugin::{plugin_fn, PluginChain};
//! use milkee_core::result::CompilationResult;
//!
//! # tokio_test::block_on(async {
//! let chain = PluginChain::new().with(plugin_fn("count", |result: &CompilationResult| {
//!     println!("{} files", result.compiled_files.len());
//!     Ok(())
//! }));
//!
//! let result = CompilationResult::new(Config::new("src", "dist"), vec![], "", "");
//! let report = chain.run(&result).await.unwrap();
//! assert_eq!(report.runs.len(), 1);
//! # });
//! ```
//!
//! [`PluginSpec`]: crate::config::PluginSpec

mod builtin;
mod chain;
mod registry;

pub use builtin::{LogPlugin, ManifestArgs, ManifestPlugin, DEFAULT_MANIFEST_FILE};
pub use chain::{PluginChain, PluginReport, PluginRun};
pub use registry::PluginRegistry;

use crate::error::Result;
use crate::result::CompilationResult;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Handles the result of a successful build
#[async_trait]
pub trait PluginExecutor: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Process a build result
    ///
    /// The host waits for the returned future before invoking the next
    /// plugin or finishing the build.
    async fn handle(&self, result: &CompilationResult) -> Result<()>;
}

/// Creates an executor from the `args` of a plugin entry
pub trait PluginFactory: Send + Sync {
    /// Build an executor, rejecting arguments it cannot use
    fn setup(&self, args: &serde_json::Value) -> Result<Arc<dyn PluginExecutor>>;
}

impl<F> PluginFactory for F
where
    F: Fn(&serde_json::Value) -> Result<Arc<dyn PluginExecutor>> + Send + Sync,
{
    fn setup(&self, args: &serde_json::Value) -> Result<Arc<dyn PluginExecutor>> {
        self(args)
    }
}

/// Executor backed by a synchronous closure
pub struct FnPlugin<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F> PluginExecutor for FnPlugin<F>
where
    F: Fn(&CompilationResult) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, result: &CompilationResult) -> Result<()> {
        (self.f)(result)
    }
}

/// Wrap a synchronous closure as a plugin
pub fn plugin_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn PluginExecutor>
where
    F: Fn(&CompilationResult) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(FnPlugin {
        name: name.into(),
        f,
    })
}

/// Executor backed by a closure returning a future
pub struct AsyncFnPlugin<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F, Fut> PluginExecutor for AsyncFnPlugin<F>
where
    F: Fn(CompilationResult) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, result: &CompilationResult) -> Result<()> {
        (self.f)(result.clone()).await
    }
}

/// Wrap an asynchronous closure as a plugin
///
/// The closure receives its own copy of the result so the future it returns
/// does not borrow from the host.
pub fn plugin_async<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn PluginExecutor>
where
    F: Fn(CompilationResult) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(AsyncFnPlugin {
        name: name.into(),
        f,
    })
}
