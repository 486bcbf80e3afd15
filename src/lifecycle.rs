//! Lifecycle traits for bean teardown.

/// Trait for synchronous bean teardown.
///
/// Implement this for beans that need structured cleanup (flushing caches,
/// releasing handles). Combined with
/// [`ExportBuilder::disposable`](crate::ExportBuilder::disposable) the hook
/// is registered automatically; destroy hooks run in LIFO order when the
/// container is destroyed.
///
/// # Examples
///
/// ```rust
/// use beancan::{ContainerBuilder, Disposable, Export, LibraryProvider, ProviderDescriptor};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Cache {
///     flushed: Arc<AtomicBool>,
/// }
///
/// impl Disposable for Cache {
///     fn dispose(&self) {
///         self.flushed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let flushed = Arc::new(AtomicBool::new(false));
/// let probe = flushed.clone();
/// let provider = ProviderDescriptor::new("cache-library")
///     .mark(LibraryProvider)
///     .export(Export::of::<Cache, _>(move |_| Ok(Cache { flushed: probe.clone() })).disposable());
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_provider(provider);
/// let container = builder.build().unwrap();
/// container.get_bean::<Cache>().unwrap();
/// container.destroy();
/// assert!(flushed.load(Ordering::SeqCst));
/// ```
pub trait Disposable: Send + Sync + 'static {
    /// Perform synchronous cleanup.
    fn dispose(&self);
}

/// Trait for asynchronous bean teardown.
///
/// Implement this for beans that require async cleanup, such as graceful
/// disconnection of a service binding. Async hooks run before sync hooks,
/// in LIFO order, when
/// [`Container::destroy_async`](crate::Container::destroy_async) is awaited;
/// the plain [`Container::destroy`](crate::Container::destroy) skips them
/// with a warning.
///
/// # Examples
///
/// ```rust
/// use beancan::AsyncDisposable;
/// use async_trait::async_trait;
///
/// struct RegistryClient {
///     endpoint: String,
/// }
///
/// #[async_trait]
/// impl AsyncDisposable for RegistryClient {
///     async fn dispose(&self) {
///         // Graceful disconnect from self.endpoint...
///         let _ = &self.endpoint;
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait AsyncDisposable: Send + Sync + 'static {
    /// Perform asynchronous cleanup.
    async fn dispose(&self);
}
