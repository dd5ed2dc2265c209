//! Plugin registry
//!
//! Maps a data-type tag to its sealed [`Plugin`]. A registry is assembled
//! once through [`PluginRegistryBuilder`] and is read-only afterwards, so it
//! can be shared between tasks without synchronization. The process-wide
//! registry of builtin plugins is available through
//! [`PluginRegistry::builtin`].
//!
//! Entries are keyed by [`DataType::as_str`], so two plugins whose tags
//! render the same can never coexist.

use crate::foundation::PluginError;
use crate::plugin::{DataType, Plugin};
use indexmap::IndexMap;
use std::sync::{Arc, LazyLock};
use tracing::debug;

static BUILTIN: LazyLock<PluginRegistry> = LazyLock::new(|| {
    let mut builder = PluginRegistry::builder();
    for plugin in crate::plugins::all() {
        builder = builder
            .register(plugin)
            .expect("builtin plugins have distinct data types");
    }
    builder.build()
});

/// Read-only lookup table from data-type tag to plugin.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: IndexMap<&'static str, Arc<Plugin>>,
}

impl PluginRegistry {
    pub fn builder() -> PluginRegistryBuilder {
        PluginRegistryBuilder::default()
    }

    /// Registry holding every builtin plugin.
    pub fn builtin() -> &'static PluginRegistry {
        &BUILTIN
    }

    /// Plugin registered for `data_type`, matched on its exact variant.
    pub fn get(&self, data_type: &DataType) -> Option<&Arc<Plugin>> {
        self.plugins
            .get(data_type.as_str())
            .filter(|plugin| plugin.data_type() == *data_type)
    }

    /// Looks a plugin up by its textual tag.
    pub fn find(&self, tag: &str) -> Option<&Arc<Plugin>> {
        self.plugins.get(tag)
    }

    pub fn contains(&self, data_type: &DataType) -> bool {
        self.get(data_type).is_some()
    }

    /// Registered data types, in registration order.
    pub fn data_types(&self) -> impl Iterator<Item = DataType> + '_ {
        self.plugins.values().map(|plugin| plugin.data_type())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Collects plugins before sealing them into a [`PluginRegistry`].
#[derive(Debug, Default)]
pub struct PluginRegistryBuilder {
    plugins: IndexMap<&'static str, Arc<Plugin>>,
}

impl PluginRegistryBuilder {
    /// Adds a plugin; a second plugin for the same tag is rejected.
    pub fn register(mut self, plugin: Arc<Plugin>) -> Result<Self, PluginError> {
        let data_type = plugin.data_type();
        if self.plugins.contains_key(data_type.as_str()) {
            return Err(PluginError::Duplicate(data_type.to_string()));
        }
        debug!(data_type = %data_type, "registering plugin");
        self.plugins.insert(data_type.as_str(), plugin);
        Ok(self)
    }

    /// Adds every plugin of an existing registry, rejecting tags already
    /// registered here.
    pub fn extend_from(mut self, registry: &PluginRegistry) -> Result<Self, PluginError> {
        for plugin in registry.plugins.values() {
            self = self.register(Arc::clone(plugin))?;
        }
        Ok(self)
    }

    pub fn build(self) -> PluginRegistry {
        PluginRegistry {
            plugins: self.plugins,
        }
    }
}
