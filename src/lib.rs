//! # beancan
//!
//! Typed bean container for modular applications, inspired by annotation-driven service
//! frameworks on the JVM.
//!
//! ## Features
//!
//! - **Provider scanning**: capability markers on descriptors select the plugin that
//!   turns each provider into bean factories
//! - **Plan-driven resolution**: dependencies are walked up front, so missing beans and
//!   cycles surface with full paths before anything is constructed
//! - **Exactly-once construction**: a sharded cache with per-bean gates guarantees one
//!   instance per key, even under concurrent first requests
//! - **Setter injection**: plain structs declare injection points and are wired without
//!   appearing in any provider
//! - **Service beans**: exports bound to a transport component get a self-refreshing
//!   endpoint binding from a pluggable lookup
//! - **Lifecycle hooks**: init hooks run before an instance is published, destroy hooks
//!   run in reverse order on `destroy()` or `destroy_async()`
//!
//! ## Quick Start
//!
//! ```rust
//! use beancan::{ContainerBuilder, Export, LibraryProvider, ProviderDescriptor};
//!
//! // Define a bean
//! struct GreetingService {
//!     prefix: String,
//! }
//!
//! impl GreetingService {
//!     fn hello(&self, name: &str) -> String {
//!         format!("{}{}", self.prefix, name)
//!     }
//! }
//!
//! // Declare a provider that exports it
//! let mut builder = ContainerBuilder::new();
//! builder.register_provider(
//!     ProviderDescriptor::new("greeting-library")
//!         .mark(LibraryProvider)
//!         .export(Export::of::<GreetingService, _>(|_| {
//!             Ok(GreetingService { prefix: "hello: ".to_string() })
//!         })),
//! );
//!
//! // Build the container and consume the bean
//! let container = builder.build().unwrap();
//! let greeting = container.get_bean::<GreetingService>().unwrap();
//! assert_eq!(greeting.hello("kalle"), "hello: kalle");
//! container.destroy();
//! ```
//!
//! ## Wiring Classes
//!
//! Types that are not exported by any provider can still receive beans through
//! declared injection points:
//!
//! ```rust
//! use beancan::{
//!     ContainerBuilder, Export, Injectable, InjectionPoints, LibraryProvider,
//!     ProviderDescriptor,
//! };
//! use std::sync::Arc;
//!
//! struct Mailer;
//!
//! #[derive(Default)]
//! struct Newsletter {
//!     mailer: Option<Arc<Mailer>>,
//! }
//!
//! impl Injectable for Newsletter {
//!     fn inject(points: &mut InjectionPoints<Self>) {
//!         points.bean_setter::<Mailer>(|n, mailer| n.mailer = Some(mailer));
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register_provider(
//!     ProviderDescriptor::new("mail")
//!         .mark(LibraryProvider)
//!         .export(Export::of::<Mailer, _>(|_| Ok(Mailer))),
//! );
//!
//! let container = builder.build().unwrap();
//! let newsletter = container.get_instance::<Newsletter>().unwrap();
//! assert!(newsletter.mailer.is_some());
//! container.destroy();
//! ```
//!
//! ## Service Beans
//!
//! Providers marked as services bind their exports to remote endpoints through a
//! [`ServiceLookup`]:
//!
//! ```rust
//! use beancan::{
//!     BeanKey, BoxError, ContainerBuilder, Export, ProviderDescriptor, ServiceEndpoint,
//!     ServiceLookup, ServiceProvider,
//! };
//! use std::sync::Arc;
//!
//! struct PingClient {
//!     target: String,
//! }
//!
//! struct StaticRegistry;
//!
//! impl ServiceLookup for StaticRegistry {
//!     fn locate(&self, _key: &BeanKey, component: &str) -> Result<ServiceEndpoint, BoxError> {
//!         Ok(ServiceEndpoint::new(format!("{}://ping", component)))
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .with_service_lookup(Arc::new(StaticRegistry))
//!     .register_provider(
//!         ProviderDescriptor::new("ping-service")
//!             .mark(ServiceProvider::new("direct"))
//!             .export(Export::of::<PingClient, _>(|cx| {
//!                 let endpoint = cx.binding()?.endpoint()?;
//!                 Ok(PingClient { target: endpoint.uri().to_string() })
//!             })),
//!     );
//!
//! let container = builder.build().unwrap();
//! let ping = container.get_bean::<PingClient>().unwrap();
//! assert_eq!(ping.target, "direct://ping");
//! container.destroy();
//! ```

// Module declarations
pub mod builder;
pub mod config;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod inject;
pub mod key;
pub mod kind;
pub mod lifecycle;
pub mod plugin;
pub mod stateful;

// Internal modules
mod cache;
mod catalog;
mod internal;
mod resolver;
mod scanner;

// Re-export core types
pub use builder::{ContainerBuilder, ProviderModule};
pub use config::{ConfigSource, DynamicConfig, MapConfigSource};
pub use container::{BeanDescriptor, Container, FactoryContext};
pub use descriptor::{LibraryProvider, ProviderDescriptor, ServiceProvider};
pub use error::{BoxError, ContainerError, ContainerResult};
pub use factory::{Export, ExportBuilder, ExportedFactory};
pub use inject::{DependencyRequest, Injectable, InjectionPoints, PointArgs};
pub use key::{BeanKey, ObjectId};
pub use kind::ProviderKind;
pub use lifecycle::{AsyncDisposable, Disposable};
pub use plugin::{PluginRegistry, ProviderPlugin};
pub use stateful::{ServiceBinding, ServiceEndpoint, ServiceLookup};
