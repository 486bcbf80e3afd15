//! Bootstrap: collect providers, plugins, and collaborators, then build.

mod modules;

pub use modules::ProviderModule;

use std::sync::Arc;

use crate::catalog::BeanCatalog;
use crate::config::{ConfigSource, DynamicConfig};
use crate::container::Container;
use crate::descriptor::ProviderDescriptor;
use crate::error::ContainerResult;
use crate::plugin::{PluginRegistry, ProviderPlugin};
use crate::scanner;
use crate::stateful::ServiceLookup;

/// Collects everything a [`Container`] is built from.
///
/// Registration order is preserved; all validation happens in
/// [`build`](Self::build), which scans the declared providers, indexes the
/// catalog, and rejects duplicate or malformed declarations.
///
/// # Examples
///
/// ```rust
/// use beancan::{ContainerBuilder, Export, LibraryProvider, ProviderDescriptor};
///
/// struct Clock;
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_provider(
///     ProviderDescriptor::new("time")
///         .mark(LibraryProvider)
///         .export(Export::of::<Clock, _>(|_| Ok(Clock))),
/// );
/// let container = builder.build().unwrap();
/// assert!(container.get_bean::<Clock>().is_ok());
/// ```
pub struct ContainerBuilder {
    descriptors: Vec<ProviderDescriptor>,
    plugins: PluginRegistry,
    sources: Vec<Arc<dyn ConfigSource>>,
    lookup: Option<Arc<dyn ServiceLookup>>,
}

impl ContainerBuilder {
    /// A builder with the standard library and service plugins registered.
    pub fn new() -> Self {
        ContainerBuilder {
            descriptors: Vec::new(),
            plugins: PluginRegistry::standard(),
            sources: Vec::new(),
            lookup: None,
        }
    }

    /// Declare one provider.
    pub fn register_provider(&mut self, descriptor: ProviderDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Register an additional provider plugin for a custom capability marker.
    pub fn register_plugin(&mut self, plugin: impl ProviderPlugin) -> &mut Self {
        self.plugins.register(plugin);
        self
    }

    /// Chain a configuration source. Earlier sources shadow later ones.
    pub fn add_config_source(&mut self, source: Arc<dyn ConfigSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Supply the lookup service beans bind their endpoints through.
    pub fn with_service_lookup(&mut self, lookup: Arc<dyn ServiceLookup>) -> &mut Self {
        self.lookup = Some(lookup);
        self
    }

    /// Apply a [`ProviderModule`]'s registrations in place.
    pub fn add_module<M: ProviderModule>(&mut self, module: M) -> ContainerResult<&mut Self> {
        module.register(self)?;
        Ok(self)
    }

    /// Scan providers, build the catalog, and hand over a live container.
    pub fn build(self) -> ContainerResult<Container> {
        let factories = scanner::scan(&self.plugins, self.descriptors)?;
        let catalog = BeanCatalog::build(factories)?;
        tracing::debug!(beans = catalog.len(), "container bootstrapped");
        let config = DynamicConfig::new(self.sources);
        Ok(Container::from_parts(catalog, config, self.lookup))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
