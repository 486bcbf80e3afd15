//! One bootstrap pass turning declared providers into a flat factory list.
//!
//! Scanning is pure data construction: no bean instance is created here, and
//! factory order follows declaration order (descriptors in registration
//! order, exports within each in declaration order).

use crate::descriptor::ProviderDescriptor;
use crate::error::{ContainerError, ContainerResult};
use crate::factory::ExportedFactory;
use crate::plugin::PluginRegistry;

pub(crate) fn scan(
    registry: &PluginRegistry,
    descriptors: Vec<ProviderDescriptor>,
) -> ContainerResult<Vec<ExportedFactory>> {
    let mut factories = Vec::new();
    for descriptor in descriptors {
        let plugin = registry.plugin_for(&descriptor)?;
        if descriptor.export_count() == 0 {
            return Err(ContainerError::IllegalProvider {
                provider: descriptor.name(),
                reason: "declares no exports".to_string(),
            });
        }
        let provider = descriptor.name();
        let produced = plugin.create_factories(descriptor)?;
        if produced.is_empty() {
            return Err(ContainerError::IllegalProvider {
                provider,
                reason: format!("plugin '{}' produced no factories", plugin.name()),
            });
        }
        tracing::debug!(
            provider,
            plugin = plugin.name(),
            factories = produced.len(),
            "scanned provider"
        );
        factories.extend(produced);
    }
    Ok(factories)
}
