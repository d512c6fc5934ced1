use super::builtin::{LogPlugin, ManifestPlugin};
use super::{PluginChain, PluginExecutor, PluginFactory};
use crate::config::{Config, PluginSpec};
use crate::error::{Error, ErrorCode, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Plugin factories by name
#[derive(Clone, Default)]
pub struct PluginRegistry {
    factories: BTreeMap<String, Arc<dyn PluginFactory>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the `log` and `manifest` plugins
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(LogPlugin::NAME, LogPlugin::setup);
        registry.register(ManifestPlugin::NAME, ManifestPlugin::setup);
        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, factory: impl PluginFactory + 'static) {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            debug!(plugin = %name, "Replaced plugin factory");
        }
    }

    /// Whether a factory is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Set up a single plugin entry
    pub fn setup(&self, spec: &PluginSpec) -> Result<Arc<dyn PluginExecutor>> {
        let factory = self
            .factories
            .get(&spec.name)
            .ok_or_else(|| Error::plugin_not_found(&spec.name))?;

        factory.setup(&spec.args).map_err(|err| {
            if err.code == ErrorCode::PluginSetupFailed {
                err
            } else {
                let message = err.message.clone();
                Error::plugin_setup(&spec.name, message).with_source(err)
            }
        })
    }

    /// Set up every entry, keeping their order
    pub fn resolve(&self, specs: &[PluginSpec]) -> Result<PluginChain> {
        specs.iter().map(|spec| self.setup(spec)).collect()
    }

    /// Set up the plugins listed in `config.milkee.plugins`
    pub fn resolve_config(&self, config: &Config) -> Result<PluginChain> {
        self.resolve(config.plugin_specs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MilkeeConfig;
    use crate::plugin::plugin_fn;
    use serde_json::{json, Value};

    fn named(name: &'static str) -> impl PluginFactory {
        move |_: &Value| Ok::<_, Error>(plugin_fn(name, |_| Ok(())))
    }

    #[test]
    fn test_builtins_registered() {
        let registry = PluginRegistry::with_builtins();
        assert_eq!(registry.names(), ["log", "manifest"]);
        assert!(registry.contains("log"));
        assert!(!registry.contains("minify"));
    }

    #[test]
    fn test_resolve_keeps_order() {
        let mut registry = PluginRegistry::new();
        registry.register("zeta", named("zeta"));
        registry.register("alpha", named("alpha"));

        let chain = registry
            .resolve(&[PluginSpec::new("zeta"), PluginSpec::new("alpha"), PluginSpec::new("zeta")])
            .unwrap();

        assert_eq!(chain.names(), ["zeta", "alpha", "zeta"]);
    }

    #[test]
    fn test_unknown_plugin() {
        let registry = PluginRegistry::with_builtins();
        let err = registry.resolve(&[PluginSpec::new("minify")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::PluginNotFound);
    }

    #[test]
    fn test_factory_receives_args() {
        let mut registry = PluginRegistry::new();
        registry.register("banner", |args: &Value| -> Result<Arc<dyn PluginExecutor>> {
            let text = args["text"]
                .as_str()
                .ok_or_else(|| Error::new(ErrorCode::InvalidInput, "text is required"))?
                .to_string();
            Ok(plugin_fn(format!("banner:{}", text), |_| Ok(())))
        });

        let chain = registry
            .resolve(&[PluginSpec::with_args("banner", json!({ "text": "hi" }))])
            .unwrap();
        assert_eq!(chain.names(), ["banner:hi"]);

        let err = registry.setup(&PluginSpec::new("banner")).err().unwrap();
        assert_eq!(err.code, ErrorCode::PluginSetupFailed);
        assert!(err.message.contains("text is required"));
    }

    #[test]
    fn test_resolve_config() {
        let config = Config::new("src", "dist").with_milkee(
            MilkeeConfig::default()
                .with_plugin(PluginSpec::new("manifest"))
                .with_plugin(PluginSpec::new("log")),
        );

        let chain = PluginRegistry::with_builtins().resolve_config(&config).unwrap();
        assert_eq!(chain.names(), ["manifest", "log"]);
    }

    #[test]
    fn test_resolve_config_without_plugins() {
        let chain = PluginRegistry::with_builtins()
            .resolve_config(&Config::new("src", "dist"))
            .unwrap();
        assert!(chain.is_empty());
    }
}
