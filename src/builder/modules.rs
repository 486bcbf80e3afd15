//! Modular registration: bundle related providers behind one type.

use crate::builder::ContainerBuilder;
use crate::error::ContainerResult;

/// A reusable bundle of registrations.
///
/// Lets applications compose a container from per-subsystem modules instead
/// of one flat list of providers.
///
/// # Examples
///
/// ```rust
/// use beancan::{
///     ContainerBuilder, ContainerResult, Export, LibraryProvider, ProviderDescriptor,
///     ProviderModule,
/// };
///
/// struct AccountRepository;
/// struct AccountService;
///
/// struct AccountsModule;
///
/// impl ProviderModule for AccountsModule {
///     fn register(self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
///         builder.register_provider(
///             ProviderDescriptor::new("accounts")
///                 .mark(LibraryProvider)
///                 .export(Export::of::<AccountRepository, _>(|_| Ok(AccountRepository)))
///                 .export(
///                     Export::of::<AccountService, _>(|cx| {
///                         let _repo = cx.get::<AccountRepository>()?;
///                         Ok(AccountService)
///                     })
///                     .requires::<AccountRepository>(),
///                 ),
///         );
///         Ok(())
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_module(AccountsModule).unwrap();
/// let container = builder.build().unwrap();
/// assert!(container.get_bean::<AccountService>().is_ok());
/// ```
pub trait ProviderModule {
    /// Apply this module's registrations to the builder.
    fn register(self, builder: &mut ContainerBuilder) -> ContainerResult<()>;
}
