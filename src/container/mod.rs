//! The container: bootstrap output and the runtime bean surface.

mod context;

pub use context::FactoryContext;
pub(crate) use context::ResolveCtx;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::cache::InstanceCache;
use crate::catalog::BeanCatalog;
use crate::config::DynamicConfig;
use crate::error::{ContainerError, ContainerResult};
use crate::inject::{self, ClassWalk, Injectable};
use crate::internal::TeardownBag;
use crate::key::{BeanKey, ObjectId};
use crate::kind::ProviderKind;
use crate::stateful::ServiceLookup;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;

/// A built container. Cheap to clone; clones share all state.
///
/// Beans are constructed lazily on first request and cached for the
/// container's lifetime. All methods are safe to call from multiple threads.
///
/// # Examples
///
/// ```rust
/// use beancan::{ContainerBuilder, Export, LibraryProvider, ProviderDescriptor};
///
/// struct Greeter {
///     prefix: &'static str,
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_provider(
///     ProviderDescriptor::new("greeting-library")
///         .mark(LibraryProvider)
///         .export(Export::of::<Greeter, _>(|_| Ok(Greeter { prefix: "hello" }))),
/// );
/// let container = builder.build().unwrap();
///
/// let greeter = container.get_bean::<Greeter>().unwrap();
/// assert_eq!(greeter.prefix, "hello");
/// container.destroy();
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) catalog: BeanCatalog,
    pub(crate) cache: InstanceCache,
    pub(crate) config: DynamicConfig,
    pub(crate) lookup: Option<Arc<dyn ServiceLookup>>,
    pub(crate) teardown: Mutex<TeardownBag>,
    destroyed: AtomicBool,
    #[cfg(feature = "once-cell")]
    consumed: OnceCell<Vec<BeanKey>>,
    #[cfg(not(feature = "once-cell"))]
    consumed: Mutex<Option<Vec<BeanKey>>>,
}

impl Container {
    pub(crate) fn from_parts(
        catalog: BeanCatalog,
        config: DynamicConfig,
        lookup: Option<Arc<dyn ServiceLookup>>,
    ) -> Self {
        Container {
            inner: Arc::new(ContainerInner {
                catalog,
                cache: InstanceCache::new(),
                config,
                lookup,
                teardown: Mutex::new(TeardownBag::default()),
                destroyed: AtomicBool::new(false),
                #[cfg(feature = "once-cell")]
                consumed: OnceCell::new(),
                #[cfg(not(feature = "once-cell"))]
                consumed: Mutex::new(None),
            }),
        }
    }

    /// The unqualified bean of type `T`, constructing it and its
    /// dependencies on first request.
    pub fn get_bean<T: Send + Sync + 'static>(&self) -> ContainerResult<Arc<T>> {
        self.bean(BeanKey::of::<T>())
    }

    /// The bean of type `T` registered under `qualifier`.
    pub fn get_bean_qualified<T: Send + Sync + 'static>(
        &self,
        qualifier: &'static str,
    ) -> ContainerResult<Arc<T>> {
        self.bean(BeanKey::qualified::<T>(qualifier))
    }

    fn bean<T: Send + Sync + 'static>(&self, key: BeanKey) -> ContainerResult<Arc<T>> {
        self.check_alive()?;
        let id = ObjectId::bean(key.clone());
        let instance = ResolveCtx::new(&self.inner).bean_instance(&key)?;
        instance.downcast::<T>().map_err(|_| {
            ContainerError::construction(id, "cached instance has an unexpected type")
        })
    }

    /// An instance of the injectable class `T`, wired through its declared
    /// injection points and cached like a bean.
    pub fn get_instance<T: Injectable>(&self) -> ContainerResult<Arc<T>> {
        self.check_alive()?;
        let id = ObjectId::class::<T>();
        if let Some(existing) = self.inner.cache.get(&id) {
            return existing.downcast::<T>().map_err(|_| {
                ContainerError::construction(id, "cached instance has an unexpected type")
            });
        }
        // Declaration problems and class cycles surface before any
        // construction gate is taken.
        let mut walk = ClassWalk::new();
        inject::prewalk_class::<T>(&mut walk)?;
        let instance = ResolveCtx::new(&self.inner).class_instance::<T>()?;
        instance.downcast::<T>().map_err(|_| {
            ContainerError::construction(id, "cached instance has an unexpected type")
        })
    }

    /// Every key this container will ask its collaborators for: all declared
    /// requirements plus the keys of service-kind beans. Sorted, duplicate
    /// free, computed once.
    pub fn consumed_bean_keys(&self) -> Vec<BeanKey> {
        #[cfg(feature = "once-cell")]
        {
            self.inner
                .consumed
                .get_or_init(|| self.compute_consumed_keys())
                .clone()
        }

        #[cfg(not(feature = "once-cell"))]
        {
            let mut memo = self.inner.consumed.lock().unwrap();
            match memo.as_ref() {
                Some(keys) => keys.clone(),
                None => {
                    let keys = self.compute_consumed_keys();
                    *memo = Some(keys.clone());
                    keys
                }
            }
        }
    }

    fn compute_consumed_keys(&self) -> Vec<BeanKey> {
        let mut keys = std::collections::BTreeSet::new();
        for (key, factory) in self.inner.catalog.iter() {
            keys.extend(factory.required_keys().iter().cloned());
            if factory.kind().is_service() {
                keys.insert(key.clone());
            }
        }
        keys.into_iter().collect()
    }

    /// One introspection record per catalog entry, sorted by key.
    pub fn bean_descriptors(&self) -> Vec<BeanDescriptor> {
        let mut descriptors: Vec<_> = self
            .inner
            .catalog
            .iter()
            .map(|(key, factory)| BeanDescriptor {
                key: key.clone(),
                owner: factory.owner(),
                kind: factory.kind(),
                requires: factory.required_keys().to_vec(),
            })
            .collect();
        descriptors.sort_by(|a, b| a.key.cmp(&b.key));
        descriptors
    }

    /// The dynamic configuration handle this container resolves against.
    pub fn config(&self) -> &DynamicConfig {
        &self.inner.config
    }

    /// Tear the container down: destroy hooks run in reverse construction
    /// order, cached instances are dropped, and later `get_bean` and
    /// `get_instance` calls fail with [`ContainerError::Destroyed`].
    ///
    /// Idempotent; only the first call runs hooks. Async destroy hooks are
    /// skipped with a warning, use [`destroy_async`](Self::destroy_async)
    /// to await them.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut bag = {
            let mut guard = self.inner.teardown.lock().unwrap();
            std::mem::take(&mut *guard)
        };
        if bag.has_async() {
            tracing::warn!("async destroy hooks skipped; call destroy_async to await them");
        }
        bag.run_all_sync_reverse();
        self.inner.cache.clear();
        tracing::debug!("container destroyed");
    }

    /// Like [`destroy`](Self::destroy), but awaits async destroy hooks
    /// first, then runs the sync ones. Both phases run in reverse
    /// construction order.
    pub async fn destroy_async(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut bag = {
            let mut guard = self.inner.teardown.lock().unwrap();
            std::mem::take(&mut *guard)
        };
        bag.run_all_async_reverse().await;
        bag.run_all_sync_reverse();
        self.inner.cache.clear();
        tracing::debug!("container destroyed");
    }

    fn check_alive(&self) -> ContainerResult<()> {
        if self.inner.destroyed.load(Ordering::SeqCst) {
            return Err(ContainerError::Destroyed);
        }
        Ok(())
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Container {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        // Warn on the last handle if teardown never ran.
        if Arc::strong_count(&self.inner) == 1 && !self.inner.destroyed.load(Ordering::SeqCst) {
            if let Ok(bag) = self.inner.teardown.try_lock() {
                if !bag.is_empty() {
                    tracing::warn!(
                        "container dropped without destroy(); registered destroy hooks never ran"
                    );
                }
            }
        }
    }
}

/// Introspection record for one catalog entry.
#[derive(Debug, Clone)]
pub struct BeanDescriptor {
    key: BeanKey,
    owner: &'static str,
    kind: ProviderKind,
    requires: Vec<BeanKey>,
}

impl BeanDescriptor {
    pub fn key(&self) -> &BeanKey {
        &self.key
    }

    /// Name of the provider that exports this bean.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The keys this bean's factory consumes, in declaration order.
    pub fn required_keys(&self) -> &[BeanKey] {
        &self.requires
    }
}
