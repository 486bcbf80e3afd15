//! Plugins that turn recognized descriptors into catalog factories.
//!
//! Dispatch is by capability marker: each plugin recognizes one marker type,
//! and the [`PluginRegistry`] routes every descriptor to exactly one plugin.
//! The built-in plugins cover [`LibraryProvider`] and [`ServiceProvider`]
//! markers; applications can register their own for custom markers.

use std::sync::Arc;

use crate::descriptor::{LibraryProvider, ProviderDescriptor, ServiceProvider};
use crate::error::{ContainerError, ContainerResult};
use crate::factory::ExportedFactory;
use crate::kind::ProviderKind;

/// Translates descriptors carrying one marker type into catalog factories.
pub trait ProviderPlugin: Send + Sync + 'static {
    /// Short name, used in bootstrap diagnostics.
    fn name(&self) -> &'static str;

    /// The kind of beans this plugin produces.
    fn kind(&self) -> ProviderKind;

    /// Whether this plugin recognizes one of the descriptor's markers.
    fn handles(&self, descriptor: &ProviderDescriptor) -> bool;

    /// Turn a recognized descriptor into one factory per export.
    fn create_factories(
        &self,
        descriptor: ProviderDescriptor,
    ) -> ContainerResult<Vec<ExportedFactory>>;
}

/// The set of plugins consulted while scanning descriptors.
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn ProviderPlugin>>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PluginRegistry {
    /// A registry with the built-in library and service plugins.
    pub fn standard() -> Self {
        PluginRegistry {
            plugins: vec![
                Arc::new(LibraryProviderPlugin),
                Arc::new(ServiceProviderPlugin),
            ],
        }
    }

    pub fn register(&mut self, plugin: impl ProviderPlugin) {
        self.plugins.push(Arc::new(plugin));
    }

    /// The single plugin responsible for `descriptor`.
    ///
    /// No match and more than one match are both bootstrap errors; a
    /// descriptor claimed by two plugins has no well-defined kind.
    pub(crate) fn plugin_for(
        &self,
        descriptor: &ProviderDescriptor,
    ) -> ContainerResult<&dyn ProviderPlugin> {
        let mut matches = self
            .plugins
            .iter()
            .filter(|plugin| plugin.handles(descriptor));

        let first = match matches.next() {
            Some(plugin) => plugin,
            None => {
                return Err(ContainerError::IllegalProvider {
                    provider: descriptor.name(),
                    reason: "no registered plugin recognizes its markers".to_string(),
                })
            }
        };
        if let Some(second) = matches.next() {
            return Err(ContainerError::IllegalProvider {
                provider: descriptor.name(),
                reason: format!(
                    "claimed by both '{}' and '{}' plugins",
                    first.name(),
                    second.name()
                ),
            });
        }
        Ok(first.as_ref())
    }
}

/// Built-in plugin for [`LibraryProvider`] descriptors.
struct LibraryProviderPlugin;

impl ProviderPlugin for LibraryProviderPlugin {
    fn name(&self) -> &'static str {
        "library"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Library
    }

    fn handles(&self, descriptor: &ProviderDescriptor) -> bool {
        descriptor.has_capability::<LibraryProvider>()
    }

    fn create_factories(
        &self,
        descriptor: ProviderDescriptor,
    ) -> ContainerResult<Vec<ExportedFactory>> {
        let owner = descriptor.name();
        Ok(descriptor
            .into_exports()
            .into_iter()
            .map(|export| export.into_factory(owner, ProviderKind::Library))
            .collect())
    }
}

/// Built-in plugin for [`ServiceProvider`] descriptors. Every produced
/// factory is routed through a stateful service binding.
struct ServiceProviderPlugin;

impl ProviderPlugin for ServiceProviderPlugin {
    fn name(&self) -> &'static str {
        "service"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Service
    }

    fn handles(&self, descriptor: &ProviderDescriptor) -> bool {
        descriptor.has_capability::<ServiceProvider>()
    }

    fn create_factories(
        &self,
        descriptor: ProviderDescriptor,
    ) -> ContainerResult<Vec<ExportedFactory>> {
        let owner = descriptor.name();
        let component = match descriptor.capability::<ServiceProvider>() {
            Some(marker) => marker.component(),
            None => {
                return Err(ContainerError::IllegalProvider {
                    provider: owner,
                    reason: "service marker missing".to_string(),
                })
            }
        };
        Ok(descriptor
            .into_exports()
            .into_iter()
            .map(|export| {
                export
                    .into_factory(owner, ProviderKind::Service)
                    .bound_to(component)
            })
            .collect())
    }
}
