use beancan::{
    ContainerBuilder, ContainerError, DynamicConfig, Export, Injectable, InjectionPoints,
    LibraryProvider, MapConfigSource, ProviderDescriptor,
};
use std::sync::{Arc, Mutex};

struct Mailer {
    host: &'static str,
}

#[derive(Default)]
struct Newsletter {
    mailer: Option<Arc<Mailer>>,
}

impl Injectable for Newsletter {
    fn inject(points: &mut InjectionPoints<Self>) {
        points.bean_setter::<Mailer>(|n, mailer| n.mailer = Some(mailer));
    }
}

fn mail_provider() -> ProviderDescriptor {
    ProviderDescriptor::new("mail")
        .mark(LibraryProvider)
        .export(Export::of::<Mailer, _>(|_| Ok(Mailer { host: "smtp.local" })))
}

#[test]
fn test_class_receives_bean() {
    let mut builder = ContainerBuilder::new();
    builder.register_provider(mail_provider());

    let container = builder.build().unwrap();
    let newsletter = container.get_instance::<Newsletter>().unwrap();
    assert_eq!(newsletter.mailer.as_ref().unwrap().host, "smtp.local");
    container.destroy();
}

#[test]
fn test_class_instance_is_cached() {
    let mut builder = ContainerBuilder::new();
    builder.register_provider(mail_provider());

    let container = builder.build().unwrap();
    let a = container.get_instance::<Newsletter>().unwrap();
    let b = container.get_instance::<Newsletter>().unwrap();
    assert!(Arc::ptr_eq(&a, &b)); // Same instance
    container.destroy();
}

#[test]
fn test_class_shares_bean_with_direct_requests() {
    let mut builder = ContainerBuilder::new();
    builder.register_provider(mail_provider());

    let container = builder.build().unwrap();
    let newsletter = container.get_instance::<Newsletter>().unwrap();
    let mailer = container.get_bean::<Mailer>().unwrap();
    assert!(Arc::ptr_eq(newsletter.mailer.as_ref().unwrap(), &mailer));
    container.destroy();
}

#[test]
fn test_points_apply_in_declaration_order() {
    struct First;
    struct Second;

    #[derive(Default)]
    struct Ordered {
        seen: Vec<&'static str>,
    }

    impl Injectable for Ordered {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter::<First>(|o, _| o.seen.push("first"));
            points.bean_setter::<Second>(|o, _| o.seen.push("second"));
        }
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("pair")
            .mark(LibraryProvider)
            .export(Export::of::<First, _>(|_| Ok(First)))
            .export(Export::of::<Second, _>(|_| Ok(Second))),
    );

    let container = builder.build().unwrap();
    let ordered = container.get_instance::<Ordered>().unwrap();
    assert_eq!(ordered.seen, vec!["first", "second"]);
    container.destroy();
}

#[test]
fn test_two_bean_point() {
    struct Left;
    struct Right;

    #[derive(Default)]
    struct Pair {
        wired: bool,
    }

    impl Injectable for Pair {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter2::<Left, Right>(|p, _left, _right| p.wired = true);
        }
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("sides")
            .mark(LibraryProvider)
            .export(Export::of::<Left, _>(|_| Ok(Left)))
            .export(Export::of::<Right, _>(|_| Ok(Right))),
    );

    let container = builder.build().unwrap();
    assert!(container.get_instance::<Pair>().unwrap().wired);
    container.destroy();
}

#[test]
fn test_independent_points_fill_all_fields() {
    struct X;
    struct Y;
    struct Z;

    #[derive(Default)]
    struct Wired {
        x: Option<Arc<X>>,
        y: Option<Arc<Y>>,
        z: Option<Arc<Z>>,
    }

    impl Injectable for Wired {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter2::<X, Y>(|w, x, y| {
                w.x = Some(x);
                w.y = Some(y);
            });
            points.bean_setter::<Z>(|w, z| w.z = Some(z));
        }
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("letters")
            .mark(LibraryProvider)
            .export(Export::of::<X, _>(|_| Ok(X)))
            .export(Export::of::<Y, _>(|_| Ok(Y)))
            .export(Export::of::<Z, _>(|_| Ok(Z))),
    );

    let container = builder.build().unwrap();
    let wired = container.get_instance::<Wired>().unwrap();
    assert!(wired.x.is_some());
    assert!(wired.y.is_some());
    assert!(wired.z.is_some());
    container.destroy();
}

#[test]
fn test_qualified_bean_setter() {
    struct Channel {
        label: &'static str,
    }

    #[derive(Default)]
    struct Subscriber {
        label: Option<&'static str>,
    }

    impl Injectable for Subscriber {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter_qualified::<Channel>("audit", |s, c| s.label = Some(c.label));
        }
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("channels")
            .mark(LibraryProvider)
            .export(Export::of::<Channel, _>(|_| Ok(Channel { label: "main" })))
            .export(
                Export::of::<Channel, _>(|_| Ok(Channel { label: "audit" })).qualified("audit"),
            ),
    );

    let container = builder.build().unwrap();
    let subscriber = container.get_instance::<Subscriber>().unwrap();
    assert_eq!(subscriber.label, Some("audit"));
    container.destroy();
}

#[test]
fn test_class_setter_chain() {
    #[derive(Default)]
    struct Inner {
        mailer: Option<Arc<Mailer>>,
    }

    impl Injectable for Inner {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter::<Mailer>(|i, mailer| i.mailer = Some(mailer));
        }
    }

    #[derive(Default)]
    struct Outer {
        inner: Option<Arc<Inner>>,
    }

    impl Injectable for Outer {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.class_setter::<Inner>(|o, inner| o.inner = Some(inner));
        }
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(mail_provider());

    let container = builder.build().unwrap();
    let outer = container.get_instance::<Outer>().unwrap();
    assert!(outer.inner.as_ref().unwrap().mailer.is_some());

    // The nested class instance is the cached one
    let inner = container.get_instance::<Inner>().unwrap();
    assert!(Arc::ptr_eq(outer.inner.as_ref().unwrap(), &inner));
    container.destroy();
}

#[test]
fn test_config_setter() {
    #[derive(Default)]
    struct Tuned {
        timeout: i64,
    }

    impl Injectable for Tuned {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.config_setter(|t, config: DynamicConfig| {
                t.timeout = config.long_property("timeoutMillis", 1000);
            });
        }
    }

    let source = MapConfigSource::new();
    source.set("timeoutMillis", "250");

    let mut builder = ContainerBuilder::new();
    builder.add_config_source(Arc::new(source));

    let container = builder.build().unwrap();
    let tuned = container.get_instance::<Tuned>().unwrap();
    assert_eq!(tuned.timeout, 250);
    container.destroy();
}

#[test]
fn test_empty_point_rejected_before_construction() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DEFAULTS: AtomicUsize = AtomicUsize::new(0);

    struct Pointless;

    impl Default for Pointless {
        fn default() -> Self {
            DEFAULTS.fetch_add(1, Ordering::SeqCst);
            Pointless
        }
    }

    impl Injectable for Pointless {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.point(Vec::new(), |_, _| Ok(()));
        }
    }

    let container = ContainerBuilder::new().build().unwrap();
    match container.get_instance::<Pointless>() {
        Err(ContainerError::InvalidInjectionTarget { class }) => {
            assert!(class.ends_with("Pointless"));
        }
        _ => panic!("Expected InvalidInjectionTarget"),
    }
    // The declaration was rejected before Default ever ran
    assert_eq!(DEFAULTS.load(Ordering::SeqCst), 0);
    container.destroy();
}

#[test]
fn test_class_missing_bean_dependency() {
    #[derive(Debug)]
    struct NeverExported;

    #[derive(Debug, Default)]
    struct Stranded {
        dep: Option<Arc<NeverExported>>,
    }

    impl Injectable for Stranded {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter::<NeverExported>(|s, d| s.dep = Some(d));
        }
    }

    let container = ContainerBuilder::new().build().unwrap();
    let err = container.get_instance::<Stranded>().unwrap_err();
    assert!(matches!(err, ContainerError::MissingBeanProvider { .. }));
    container.destroy();
}

#[test]
fn test_class_init_hook_runs_before_publication() {
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    struct InitLog(Arc<Mutex<Vec<&'static str>>>);

    #[derive(Default)]
    struct Tracked {
        log: Option<Arc<InitLog>>,
    }

    impl Injectable for Tracked {
        fn inject(points: &mut InjectionPoints<Self>) {
            points.bean_setter::<InitLog>(|t, log| t.log = Some(log));
            points.on_init(|t| {
                if let Some(log) = &t.log {
                    log.0.lock().unwrap().push("init");
                }
            });
        }
    }

    let handle = log.clone();
    let mut builder = ContainerBuilder::new();
    builder.register_provider(
        ProviderDescriptor::new("logs")
            .mark(LibraryProvider)
            .export(Export::of::<InitLog, _>(move |_| Ok(InitLog(handle.clone())))),
    );

    let container = builder.build().unwrap();
    container.get_instance::<Tracked>().unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["init"]);
    container.destroy();
}
