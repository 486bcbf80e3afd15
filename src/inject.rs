//! Setter-style injection for plain classes outside the catalog.
//!
//! A class opts in by implementing [`Injectable`]: default construction plus
//! a declaration of its injection points. Each point names what it consumes
//! and how to apply it; the engine resolves every point in declaration order
//! before anyone sees the instance. Injected classes are cached under
//! [`ObjectId::Class`] with the same at-most-once guarantee as beans.

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::DynamicConfig;
use crate::container::ResolveCtx;
use crate::error::{BoxError, ContainerError, ContainerResult};
use crate::factory::{erase_hook, AnyArc, HookFn};
use crate::internal::TeardownBag;
use crate::key::{BeanKey, ObjectId};

/// A plain class the container can wire without a provider.
///
/// # Examples
///
/// ```rust
/// use beancan::{DependencyRequest, Injectable, InjectionPoints};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct AuditLog {
///     sink: Option<Arc<String>>,
/// }
///
/// impl Injectable for AuditLog {
///     fn inject(points: &mut InjectionPoints<Self>) {
///         points.bean_setter::<String>(|log, sink| log.sink = Some(sink));
///     }
/// }
/// ```
pub trait Injectable: Default + Send + Sync + 'static {
    /// Declare this class's injection points.
    fn inject(points: &mut InjectionPoints<Self>);
}

type ApplyFn = Box<dyn Fn(&mut dyn Any, &mut PointArgs) -> Result<(), BoxError> + Send + Sync>;

pub(crate) struct Point {
    requires: Vec<DependencyRequest>,
    apply: ApplyFn,
}

/// Declaration list built by [`Injectable::inject`].
pub struct InjectionPoints<T> {
    points: Vec<Point>,
    init_hooks: Vec<HookFn>,
    destroy_hooks: Vec<HookFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> InjectionPoints<T> {
    pub(crate) fn new() -> Self {
        InjectionPoints {
            points: Vec::new(),
            init_hooks: Vec::new(),
            destroy_hooks: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare one injection point from an explicit dependency set.
    ///
    /// The apply closure reads the resolved set positionally through
    /// [`PointArgs`]. An empty set is a declaration error, reported when the
    /// class is first requested.
    pub fn point(
        &mut self,
        requires: Vec<DependencyRequest>,
        apply: impl Fn(&mut T, &mut PointArgs) -> Result<(), BoxError> + Send + Sync + 'static,
    ) {
        self.points.push(Point {
            requires,
            apply: erase_apply(apply),
        });
    }

    /// One catalog bean into one setter.
    pub fn bean_setter<A: Send + Sync + 'static>(
        &mut self,
        apply: impl Fn(&mut T, Arc<A>) + Send + Sync + 'static,
    ) {
        self.point(vec![DependencyRequest::bean::<A>()], move |t, args| {
            apply(t, args.take::<A>()?);
            Ok(())
        });
    }

    /// A qualified catalog bean into one setter.
    pub fn bean_setter_qualified<A: Send + Sync + 'static>(
        &mut self,
        qualifier: &'static str,
        apply: impl Fn(&mut T, Arc<A>) + Send + Sync + 'static,
    ) {
        self.point(
            vec![DependencyRequest::bean_qualified::<A>(qualifier)],
            move |t, args| {
                apply(t, args.take::<A>()?);
                Ok(())
            },
        );
    }

    /// Two beans through one point; both resolve before the setter runs.
    pub fn bean_setter2<A, B>(&mut self, apply: impl Fn(&mut T, Arc<A>, Arc<B>) + Send + Sync + 'static)
    where
        A: Send + Sync + 'static,
        B: Send + Sync + 'static,
    {
        self.point(
            vec![DependencyRequest::bean::<A>(), DependencyRequest::bean::<B>()],
            move |t, args| {
                let a = args.take::<A>()?;
                let b = args.take::<B>()?;
                apply(t, a, b);
                Ok(())
            },
        );
    }

    /// Another injectable class as a dependency.
    pub fn class_setter<A: Injectable>(
        &mut self,
        apply: impl Fn(&mut T, Arc<A>) + Send + Sync + 'static,
    ) {
        self.point(vec![DependencyRequest::class::<A>()], move |t, args| {
            apply(t, args.take::<A>()?);
            Ok(())
        });
    }

    /// The container's dynamic configuration handle.
    pub fn config_setter(&mut self, apply: impl Fn(&mut T, DynamicConfig) + Send + Sync + 'static) {
        self.point(vec![DependencyRequest::config()], move |t, args| {
            apply(t, args.take_config()?);
            Ok(())
        });
    }

    /// Run after every point has applied, before the instance is published.
    pub fn on_init(&mut self, f: impl Fn(&T) + Send + Sync + 'static) {
        self.init_hooks.push(erase_hook(move |t: &T| {
            f(t);
            Ok(())
        }));
    }

    /// Run when the container is destroyed, in reverse construction order.
    pub fn on_destroy(&mut self, f: impl Fn(&T) + Send + Sync + 'static) {
        self.destroy_hooks.push(erase_hook(move |t: &T| {
            f(t);
            Ok(())
        }));
    }
}

fn erase_apply<T: 'static>(
    f: impl Fn(&mut T, &mut PointArgs) -> Result<(), BoxError> + Send + Sync + 'static,
) -> ApplyFn {
    Box::new(move |any, args| match any.downcast_mut::<T>() {
        Some(t) => f(t, args),
        None => Err(format!(
            "injection point expected {}, found another type",
            std::any::type_name::<T>()
        )
        .into()),
    })
}

/// One dependency consumed by an injection point.
pub struct DependencyRequest {
    kind: RequestKind,
}

enum RequestKind {
    Bean(BeanKey),
    Class {
        prewalk: fn(&mut ClassWalk) -> ContainerResult<()>,
        build: for<'a> fn(&ResolveCtx<'a>) -> ContainerResult<AnyArc>,
    },
    Config,
}

impl DependencyRequest {
    /// The unqualified catalog bean of type `A`.
    pub fn bean<A: Send + Sync + 'static>() -> Self {
        DependencyRequest {
            kind: RequestKind::Bean(BeanKey::of::<A>()),
        }
    }

    /// A qualified catalog bean of type `A`.
    pub fn bean_qualified<A: Send + Sync + 'static>(qualifier: &'static str) -> Self {
        DependencyRequest {
            kind: RequestKind::Bean(BeanKey::qualified::<A>(qualifier)),
        }
    }

    /// Another injectable class, wired recursively.
    pub fn class<A: Injectable>() -> Self {
        DependencyRequest {
            kind: RequestKind::Class {
                prewalk: prewalk_class::<A>,
                build: class_entry::<A>,
            },
        }
    }

    /// The container's dynamic configuration handle.
    pub fn config() -> Self {
        DependencyRequest {
            kind: RequestKind::Config,
        }
    }
}

/// Resolved dependency values for one point, consumed positionally.
pub struct PointArgs {
    values: std::vec::IntoIter<ResolvedArg>,
}

pub(crate) enum ResolvedArg {
    Instance(AnyArc),
    Config(DynamicConfig),
}

impl PointArgs {
    fn new(values: Vec<ResolvedArg>) -> Self {
        PointArgs {
            values: values.into_iter(),
        }
    }

    /// The next resolved dependency, downcast to `A`.
    pub fn take<A: Send + Sync + 'static>(&mut self) -> Result<Arc<A>, BoxError> {
        match self.values.next() {
            Some(ResolvedArg::Instance(any)) => any.downcast::<A>().map_err(|_| {
                format!(
                    "injection argument is not {}",
                    std::any::type_name::<A>()
                )
                .into()
            }),
            Some(ResolvedArg::Config(_)) => {
                Err("injection argument is the config handle, use take_config".into())
            }
            None => Err("injection point consumed more arguments than it declared".into()),
        }
    }

    /// The next resolved dependency, which must be the config handle.
    pub fn take_config(&mut self) -> Result<DynamicConfig, BoxError> {
        match self.values.next() {
            Some(ResolvedArg::Config(config)) => Ok(config),
            Some(ResolvedArg::Instance(_)) => {
                Err("injection argument is a bean, not the config handle".into())
            }
            None => Err("injection point consumed more arguments than it declared".into()),
        }
    }
}

pub(crate) struct CollectedPoints {
    points: Vec<Point>,
    init_hooks: Vec<HookFn>,
    destroy_hooks: Vec<HookFn>,
}

/// Assemble and validate `T`'s declaration list.
pub(crate) fn collect<T: Injectable>() -> ContainerResult<CollectedPoints> {
    let mut points = InjectionPoints::<T>::new();
    T::inject(&mut points);
    if points.points.iter().any(|p| p.requires.is_empty()) {
        return Err(ContainerError::InvalidInjectionTarget {
            class: std::any::type_name::<T>(),
        });
    }
    Ok(CollectedPoints {
        points: points.points,
        init_hooks: points.init_hooks,
        destroy_hooks: points.destroy_hooks,
    })
}

/// Walk state for pre-construction cycle detection across classes.
///
/// The walk runs before any construction lock is taken, so two threads
/// starting from different roots of the same cyclic class graph both fail
/// instead of deadlocking on each other's gates.
pub(crate) struct ClassWalk {
    on_path: Vec<ObjectId>,
    verified: HashSet<TypeId>,
}

impl ClassWalk {
    pub(crate) fn new() -> Self {
        ClassWalk {
            on_path: Vec::new(),
            verified: HashSet::new(),
        }
    }
}

/// Validate `T`'s declarations and detect class cycles, transitively.
pub(crate) fn prewalk_class<T: Injectable>(walk: &mut ClassWalk) -> ContainerResult<()> {
    let type_id = TypeId::of::<T>();
    if walk.verified.contains(&type_id) {
        return Ok(());
    }
    let id = ObjectId::class::<T>();
    if let Some(cycle_start) = walk.on_path.iter().position(|seen| *seen == id) {
        let path = walk.on_path[cycle_start..]
            .iter()
            .cloned()
            .chain(std::iter::once(id))
            .collect();
        return Err(ContainerError::CircularDependency { path });
    }
    let collected = collect::<T>()?;
    walk.on_path.push(id);
    for point in &collected.points {
        for request in &point.requires {
            if let RequestKind::Class { prewalk, .. } = &request.kind {
                prewalk(walk)?;
            }
        }
    }
    walk.on_path.pop();
    walk.verified.insert(type_id);
    Ok(())
}

fn class_entry<A: Injectable>(cx: &ResolveCtx<'_>) -> ContainerResult<AnyArc> {
    cx.class_instance::<A>()
}

/// Default-construct `T`, apply every point in declaration order, run init
/// hooks, and queue destroy hooks. Caller publishes through the cache.
pub(crate) fn construct_class<T: Injectable>(cx: &ResolveCtx<'_>) -> ContainerResult<AnyArc> {
    let id = ObjectId::class::<T>();
    let collected = collect::<T>()?;
    let mut instance = T::default();
    for point in &collected.points {
        let mut values = Vec::with_capacity(point.requires.len());
        for request in &point.requires {
            values.push(match &request.kind {
                RequestKind::Bean(key) => ResolvedArg::Instance(cx.bean_instance(key)?),
                RequestKind::Class { build, .. } => ResolvedArg::Instance(build(cx)?),
                RequestKind::Config => ResolvedArg::Config(cx.config().clone()),
            });
        }
        let mut args = PointArgs::new(values);
        (point.apply)(&mut instance, &mut args)
            .map_err(|source| ContainerError::construction(id.clone(), source))?;
    }
    let instance: AnyArc = Arc::new(instance);
    for hook in &collected.init_hooks {
        hook(instance.as_ref()).map_err(|source| ContainerError::construction(id.clone(), source))?;
    }
    cx.bind_teardown(|bag| bind_class_teardown(&id, &collected.destroy_hooks, &instance, bag));
    Ok(instance)
}

pub(crate) fn bind_class_teardown(
    id: &ObjectId,
    hooks: &[HookFn],
    instance: &AnyArc,
    bag: &mut TeardownBag,
) {
    for hook in hooks {
        let hook = hook.clone();
        let instance = instance.clone();
        let object = id.clone();
        bag.push_sync(Box::new(move || {
            if let Err(error) = hook(instance.as_ref()) {
                tracing::error!(object = %object, %error, "destroy hook failed");
            }
        }));
    }
}
