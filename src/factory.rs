//! Export declarations and the typed factories built from them.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::BoxError;
use crate::internal::{BoxFutureUnit, TeardownBag};
use crate::key::BeanKey;
use crate::kind::ProviderKind;
use crate::lifecycle::{AsyncDisposable, Disposable};

// FactoryContext is defined in the container module.
pub(crate) use crate::container::FactoryContext;

/// Type-erased Arc for cached instances.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Constructor closure invoked with the factory's resolution context.
pub(crate) type CtorFn =
    Arc<dyn for<'a> Fn(&FactoryContext<'a>) -> Result<AnyArc, BoxError> + Send + Sync>;

/// Erased lifecycle hook operating on the cached instance.
pub(crate) type HookFn = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), BoxError> + Send + Sync>;

/// Erased async destroy hook; takes ownership of a handle to the instance.
pub(crate) type AsyncHookFn = Arc<dyn Fn(AnyArc) -> BoxFutureUnit + Send + Sync>;

/// One exported bean declaration, ready to be attached to a provider.
///
/// Built through [`ExportBuilder`], which is what [`Export::of`] returns;
/// the builder converts into `Export` implicitly when passed to
/// [`ProviderDescriptor::export`](crate::ProviderDescriptor::export).
pub struct Export {
    pub(crate) produced: BeanKey,
    pub(crate) requires: Vec<BeanKey>,
    pub(crate) ctor: CtorFn,
    pub(crate) init_hooks: Vec<HookFn>,
    pub(crate) destroy_hooks: Vec<HookFn>,
    pub(crate) async_destroy_hooks: Vec<AsyncHookFn>,
}

impl Export {
    /// Start declaring an export of type `T` with the given constructor.
    ///
    /// The constructor receives a [`FactoryContext`] through which it reads
    /// its declared dependencies and the dynamic configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beancan::{Export, FactoryContext};
    ///
    /// struct HelloBean {
    ///     prefix: String,
    /// }
    ///
    /// let export: Export = Export::of::<HelloBean, _>(|_cx: &FactoryContext| {
    ///     Ok(HelloBean { prefix: "hello: ".into() })
    /// })
    /// .into();
    /// assert!(export.key().type_name().ends_with("HelloBean"));
    /// ```
    pub fn of<T, F>(ctor: F) -> ExportBuilder<T>
    where
        T: Send + Sync + 'static,
        F: Fn(&FactoryContext) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        ExportBuilder {
            produced: BeanKey::of::<T>(),
            requires: Vec::new(),
            ctor: Arc::new(move |cx: &FactoryContext| ctor(cx).map(|t| Arc::new(t) as AnyArc)),
            init_hooks: Vec::new(),
            destroy_hooks: Vec::new(),
            async_destroy_hooks: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// The key this export produces.
    pub fn key(&self) -> &BeanKey {
        &self.produced
    }

    /// The keys this export's factory consumes, in declaration order.
    pub fn required_keys(&self) -> &[BeanKey] {
        &self.requires
    }

    /// Stamp this declaration with its owning provider and kind, producing
    /// a catalog-ready factory. Called by [`ProviderPlugin`](crate::ProviderPlugin)
    /// implementations.
    pub fn into_factory(self, owner: &'static str, kind: ProviderKind) -> ExportedFactory {
        ExportedFactory {
            produced: self.produced,
            requires: self.requires,
            owner,
            kind,
            invoke: self.ctor,
            init_hooks: self.init_hooks,
            destroy_hooks: self.destroy_hooks,
            async_destroy_hooks: self.async_destroy_hooks,
        }
    }
}

/// Fluent builder for one export declaration.
///
/// Keeps the produced type around so dependency keys, qualifiers, and
/// lifecycle hooks can be declared with full type safety before the
/// declaration is erased into an [`Export`].
pub struct ExportBuilder<T> {
    produced: BeanKey,
    requires: Vec<BeanKey>,
    ctor: CtorFn,
    init_hooks: Vec<HookFn>,
    destroy_hooks: Vec<HookFn>,
    async_destroy_hooks: Vec<AsyncHookFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ExportBuilder<T> {
    /// Discriminate this export from other providers of the same type.
    pub fn qualified(mut self, qualifier: &'static str) -> Self {
        self.produced = BeanKey::qualified::<T>(qualifier);
        self
    }

    /// Declare a dependency on the unqualified bean of type `D`.
    ///
    /// Dependencies are resolved before the constructor runs, in the order
    /// they are declared here; the constructor reads them through its
    /// context. Reading a key that was never declared is a construction
    /// error.
    pub fn requires<D: 'static>(mut self) -> Self {
        self.requires.push(BeanKey::of::<D>());
        self
    }

    /// Declare a dependency on a qualified bean of type `D`.
    pub fn requires_qualified<D: 'static>(mut self, qualifier: &'static str) -> Self {
        self.requires.push(BeanKey::qualified::<D>(qualifier));
        self
    }

    /// Run `f` on the fresh instance before it becomes visible to anyone.
    ///
    /// Init hooks run in declaration order; the instance is published to
    /// the cache only after every hook has finished.
    pub fn on_init(self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.try_on_init(move |t| {
            f(t);
            Ok(())
        })
    }

    /// Fallible variant of [`on_init`](Self::on_init); an `Err` fails the
    /// construction and nothing is cached.
    pub fn try_on_init(
        mut self,
        f: impl Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.init_hooks.push(erase_hook(f));
        self
    }

    /// Run `f` on the instance when the container is destroyed.
    ///
    /// Destroy hooks across the whole container run in reverse construction
    /// order.
    pub fn on_destroy(self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.try_on_destroy(move |t| {
            f(t);
            Ok(())
        })
    }

    /// Fallible variant of [`on_destroy`](Self::on_destroy); failures are
    /// logged and the remaining hooks still run.
    pub fn try_on_destroy(
        mut self,
        f: impl Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.destroy_hooks.push(erase_hook(f));
        self
    }

    /// Register an async destroy hook, awaited by
    /// [`Container::destroy_async`](crate::Container::destroy_async).
    pub fn on_destroy_async<Fut>(
        mut self,
        f: impl Fn(Arc<T>) -> Fut + Send + Sync + 'static,
    ) -> Self
    where
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.async_destroy_hooks.push(Arc::new(move |any: AnyArc| {
            match any.downcast::<T>() {
                Ok(t) => Box::pin(f(t)) as BoxFutureUnit,
                Err(_) => Box::pin(async {}) as BoxFutureUnit,
            }
        }));
        self
    }

    /// Tear the bean down through its [`Disposable`] impl at destroy time.
    pub fn disposable(self) -> Self
    where
        T: Disposable,
    {
        self.on_destroy(|t| t.dispose())
    }

    /// Tear the bean down through its [`AsyncDisposable`] impl when the
    /// container is destroyed asynchronously.
    pub fn async_disposable(self) -> Self
    where
        T: AsyncDisposable,
    {
        self.on_destroy_async(|t: Arc<T>| async move { t.dispose().await })
    }
}

pub(crate) fn erase_hook<T: Send + Sync + 'static>(
    f: impl Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
) -> HookFn {
    Arc::new(move |any: &(dyn Any + Send + Sync)| match any.downcast_ref::<T>() {
        Some(t) => f(t),
        None => Err(format!(
            "lifecycle hook expected {}, found another type",
            std::any::type_name::<T>()
        )
        .into()),
    })
}

impl<T: Send + Sync + 'static> From<ExportBuilder<T>> for Export {
    fn from(builder: ExportBuilder<T>) -> Self {
        Export {
            produced: builder.produced,
            requires: builder.requires,
            ctor: builder.ctor,
            init_hooks: builder.init_hooks,
            destroy_hooks: builder.destroy_hooks,
            async_destroy_hooks: builder.async_destroy_hooks,
        }
    }
}

/// A catalog-ready factory: one per exported bean, stamped with its owner
/// and kind during scanning. Immutable once built.
pub struct ExportedFactory {
    produced: BeanKey,
    requires: Vec<BeanKey>,
    owner: &'static str,
    kind: ProviderKind,
    invoke: CtorFn,
    init_hooks: Vec<HookFn>,
    destroy_hooks: Vec<HookFn>,
    async_destroy_hooks: Vec<AsyncHookFn>,
}

impl ExportedFactory {
    /// The key this factory produces.
    pub fn produced(&self) -> &BeanKey {
        &self.produced
    }

    /// The keys this factory consumes, in declaration order.
    pub fn required_keys(&self) -> &[BeanKey] {
        &self.requires
    }

    /// Name of the provider that declared this factory.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Route constructions through a self-refreshing service binding on the
    /// given transport component. The binding reaches the constructor via
    /// [`FactoryContext::binding`](crate::FactoryContext::binding).
    pub fn bound_to(self, component: &'static str) -> Self {
        let key = self.produced.clone();
        self.map_invoke(|raw| crate::stateful::stateful_invoke(key, component, raw))
    }

    pub(crate) fn invoke(&self, cx: &FactoryContext<'_>) -> Result<AnyArc, BoxError> {
        (self.invoke)(cx)
    }

    /// Run every init hook against the fresh instance, declaration order.
    pub(crate) fn run_init_hooks(&self, instance: &AnyArc) -> Result<(), BoxError> {
        for hook in &self.init_hooks {
            hook(instance.as_ref())?;
        }
        Ok(())
    }

    /// Bind this factory's destroy hooks to `instance` and queue them.
    pub(crate) fn bind_teardown(&self, instance: &AnyArc, bag: &mut TeardownBag) {
        for hook in &self.destroy_hooks {
            let hook = hook.clone();
            let instance = instance.clone();
            let bean = self.produced.clone();
            bag.push_sync(Box::new(move || {
                if let Err(error) = hook(instance.as_ref()) {
                    tracing::error!(bean = %bean, %error, "destroy hook failed");
                }
            }));
        }
        for hook in &self.async_destroy_hooks {
            let hook = hook.clone();
            let instance = instance.clone();
            bag.push_async(move || hook(instance));
        }
    }

    /// Replace the invocation, keeping keys, owner, kind, and hooks.
    ///
    /// Used by the service plugin to layer the stateful wrapper ahead of
    /// the raw constructor.
    pub(crate) fn map_invoke(self, wrap: impl FnOnce(CtorFn) -> CtorFn) -> Self {
        ExportedFactory {
            invoke: wrap(self.invoke),
            ..self
        }
    }
}
