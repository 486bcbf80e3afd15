//! Resolution plumbing: the driver that walks build plans and the context
//! handed to factory constructors.

use std::sync::Arc;

use crate::config::DynamicConfig;
use crate::container::ContainerInner;
use crate::error::{BoxError, ContainerError, ContainerResult};
use crate::factory::{AnyArc, ExportedFactory};
use crate::inject::{self, Injectable};
use crate::internal::TeardownBag;
use crate::key::{BeanKey, ObjectId};
use crate::stateful::{ServiceBinding, ServiceLookup};

/// Shared-state handle threaded through one resolution call.
pub(crate) struct ResolveCtx<'a> {
    inner: &'a ContainerInner,
}

impl<'a> ResolveCtx<'a> {
    pub(crate) fn new(inner: &'a ContainerInner) -> Self {
        ResolveCtx { inner }
    }

    /// The instance for a catalog bean: plan the subtree, then construct
    /// each planned factory through the cache, dependencies first.
    pub(crate) fn bean_instance(&self, key: &BeanKey) -> ContainerResult<AnyArc> {
        let id = ObjectId::bean(key.clone());
        if let Some(existing) = self.inner.cache.get(&id) {
            return Ok(existing);
        }
        let plan = crate::resolver::resolve(&self.inner.catalog, key)?;
        let mut requested = None;
        for factory in plan.factories() {
            let fid = ObjectId::bean(factory.produced().clone());
            let instance = self
                .inner
                .cache
                .get_or_create(&fid, || self.construct_bean(factory, &fid))?;
            requested = Some(instance);
        }
        // The plan ends with the requested key itself.
        match requested {
            Some(instance) => Ok(instance),
            None => Err(ContainerError::MissingBeanProvider { key: key.clone() }),
        }
    }

    /// The cached instance for an injectable class, constructing on first
    /// request. Callers must have pre-walked the class graph.
    pub(crate) fn class_instance<T: Injectable>(&self) -> ContainerResult<AnyArc> {
        let id = ObjectId::class::<T>();
        self.inner
            .cache
            .get_or_create(&id, || inject::construct_class::<T>(self))
    }

    fn construct_bean(
        &self,
        factory: &Arc<ExportedFactory>,
        id: &ObjectId,
    ) -> ContainerResult<AnyArc> {
        let cx = FactoryContext {
            inner: self.inner,
            factory,
            binding: None,
        };
        let instance = factory
            .invoke(&cx)
            .map_err(|source| ContainerError::construction(id.clone(), source))?;
        factory
            .run_init_hooks(&instance)
            .map_err(|source| ContainerError::construction(id.clone(), source))?;
        self.bind_teardown(|bag| factory.bind_teardown(&instance, bag));
        tracing::debug!(bean = %id, provider = factory.owner(), "bean constructed");
        Ok(instance)
    }

    pub(crate) fn config(&self) -> &DynamicConfig {
        &self.inner.config
    }

    /// Queue teardown work on the container's bag.
    pub(crate) fn bind_teardown(&self, bind: impl FnOnce(&mut TeardownBag)) {
        let mut bag = self.inner.teardown.lock().unwrap();
        bind(&mut bag);
    }
}

/// What a factory constructor sees while it runs.
///
/// Dependencies declared through
/// [`ExportBuilder::requires`](crate::ExportBuilder::requires) are already
/// constructed when the constructor is invoked and are read with
/// [`get`](Self::get); reading an undeclared key is a construction error.
///
/// # Examples
///
/// ```rust
/// use beancan::{ContainerBuilder, Export, LibraryProvider, ProviderDescriptor};
///
/// struct Config {
///     url: &'static str,
/// }
///
/// struct Client {
///     url: &'static str,
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_provider(
///     ProviderDescriptor::new("http")
///         .mark(LibraryProvider)
///         .export(Export::of::<Config, _>(|_| Ok(Config { url: "http://localhost" })))
///         .export(
///             Export::of::<Client, _>(|cx| {
///                 let config = cx.get::<Config>()?;
///                 Ok(Client { url: config.url })
///             })
///             .requires::<Config>(),
///         ),
/// );
/// let container = builder.build().unwrap();
/// assert_eq!(container.get_bean::<Client>().unwrap().url, "http://localhost");
/// ```
pub struct FactoryContext<'a> {
    inner: &'a ContainerInner,
    factory: &'a ExportedFactory,
    binding: Option<Arc<ServiceBinding>>,
}

impl<'a> FactoryContext<'a> {
    /// The declared dependency of type `D`.
    pub fn get<D: Send + Sync + 'static>(&self) -> Result<Arc<D>, BoxError> {
        self.get_key(BeanKey::of::<D>())
    }

    /// The declared dependency of type `D` under `qualifier`.
    pub fn get_qualified<D: Send + Sync + 'static>(
        &self,
        qualifier: &'static str,
    ) -> Result<Arc<D>, BoxError> {
        self.get_key(BeanKey::qualified::<D>(qualifier))
    }

    fn get_key<D: Send + Sync + 'static>(&self, key: BeanKey) -> Result<Arc<D>, BoxError> {
        if !self.factory.required_keys().contains(&key) {
            return Err(format!("dependency {} was not declared with requires()", key).into());
        }
        let id = ObjectId::bean(key.clone());
        match self.inner.cache.get(&id) {
            Some(instance) => instance
                .downcast::<D>()
                .map_err(|_| format!("dependency {} has an unexpected type", key).into()),
            None => Err(format!("dependency {} is not constructed yet", key).into()),
        }
    }

    /// The container's dynamic configuration.
    pub fn config(&self) -> &DynamicConfig {
        &self.inner.config
    }

    /// The service binding attached to this construction.
    ///
    /// Present for exports of service kind; library exports have none.
    pub fn binding(&self) -> Result<Arc<ServiceBinding>, BoxError> {
        self.binding
            .clone()
            .ok_or_else(|| "no service binding attached; only service exports bind".into())
    }

    pub(crate) fn service_lookup(&self) -> Option<Arc<dyn ServiceLookup>> {
        self.inner.lookup.clone()
    }

    pub(crate) fn with_binding(&self, binding: Arc<ServiceBinding>) -> FactoryContext<'a> {
        FactoryContext {
            inner: self.inner,
            factory: self.factory,
            binding: Some(binding),
        }
    }
}
