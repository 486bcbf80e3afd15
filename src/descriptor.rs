//! Provider descriptors: named bundles of exports carrying capability markers.
//!
//! A descriptor says nothing about *how* its beans are materialized. That is
//! decided at bootstrap, when a [`ProviderPlugin`](crate::ProviderPlugin)
//! recognizes one of the descriptor's markers and turns the exports into
//! catalog factories.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::factory::Export;

/// Marks a provider whose beans are plain in-process objects.
///
/// Library beans are constructed directly from their declared factories and
/// handed out as-is.
#[derive(Debug, Clone, Copy)]
pub struct LibraryProvider;

/// Marks a provider whose beans front remote service endpoints.
///
/// Service beans are constructed through a [`ServiceBinding`](crate::ServiceBinding)
/// obtained from the container's [`ServiceLookup`](crate::ServiceLookup), using
/// the transport component named here.
#[derive(Debug, Clone, Copy)]
pub struct ServiceProvider {
    component: &'static str,
}

impl ServiceProvider {
    /// A service marker for the given transport component, e.g. `"direct"`.
    pub fn new(component: &'static str) -> Self {
        ServiceProvider { component }
    }

    /// The transport component used to locate this provider's endpoints.
    pub fn component(&self) -> &'static str {
        self.component
    }
}

/// A named provider declaration: capability markers plus exported beans.
///
/// # Examples
///
/// ```rust
/// use beancan::{Export, LibraryProvider, ProviderDescriptor};
///
/// struct Greeting(String);
///
/// let provider = ProviderDescriptor::new("greeting-library")
///     .mark(LibraryProvider)
///     .export(Export::of::<Greeting, _>(|_| Ok(Greeting("hej".into()))));
///
/// assert_eq!(provider.name(), "greeting-library");
/// assert!(provider.has_capability::<LibraryProvider>());
/// ```
pub struct ProviderDescriptor {
    name: &'static str,
    markers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    exports: Vec<Export>,
}

impl ProviderDescriptor {
    /// A descriptor with no markers and no exports yet.
    pub fn new(name: &'static str) -> Self {
        ProviderDescriptor {
            name,
            markers: HashMap::new(),
            exports: Vec::new(),
        }
    }

    /// Attach a capability marker. A later marker of the same type replaces
    /// the earlier one.
    pub fn mark<M: Any + Send + Sync>(mut self, marker: M) -> Self {
        self.markers.insert(TypeId::of::<M>(), Box::new(marker));
        self
    }

    /// Attach one exported bean declaration.
    pub fn export(mut self, export: impl Into<Export>) -> Self {
        self.exports.push(export.into());
        self
    }

    /// The provider's name, used in bootstrap diagnostics and error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether a marker of type `M` is attached.
    pub fn has_capability<M: Any>(&self) -> bool {
        self.markers.contains_key(&TypeId::of::<M>())
    }

    /// The attached marker of type `M`, if any.
    pub fn capability<M: Any>(&self) -> Option<&M> {
        self.markers
            .get(&TypeId::of::<M>())
            .and_then(|marker| marker.downcast_ref::<M>())
    }

    /// Number of exported beans.
    pub fn export_count(&self) -> usize {
        self.exports.len()
    }

    /// Consume the descriptor, yielding its export declarations in order.
    /// Called by [`ProviderPlugin`](crate::ProviderPlugin) implementations.
    pub fn into_exports(self) -> Vec<Export> {
        self.exports
    }
}
