/// Property-based tests for bean resolution.
///
/// These tests verify resolution invariants over generated dependency
/// graphs: memoization, chain ordering, duplicate detection, and the
/// shape of the consumed-keys report.
use beancan::{
    BeanKey, ContainerBuilder, ContainerError, Export, LibraryProvider, ProviderDescriptor,
};
use proptest::prelude::*;
use std::sync::Arc;

// Qualifiers must be 'static, so generated indices pick from a fixed table.
static QUALIFIERS: [&str; 10] = ["q0", "q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8", "q9"];

#[derive(Debug)]
struct Link;

#[derive(Debug)]
struct Payload {
    value: i64,
}

/// Register a chain Link(q0) <- Link(q1) <- ... <- Link(q{n-1}).
fn chain_provider(n: usize) -> ProviderDescriptor {
    let mut descriptor = ProviderDescriptor::new("chain").mark(LibraryProvider);
    for i in 0..n {
        let mut export = Export::of::<Link, _>(move |cx| {
            if i > 0 {
                cx.get_qualified::<Link>(QUALIFIERS[i - 1])?;
            }
            Ok(Link)
        })
        .qualified(QUALIFIERS[i]);
        if i > 0 {
            export = export.requires_qualified::<Link>(QUALIFIERS[i - 1]);
        }
        descriptor = descriptor.export(export);
    }
    descriptor
}

proptest! {
    #[test]
    fn resolved_bean_reflects_its_factory(value in any::<i64>()) {
        let mut builder = ContainerBuilder::new();
        builder.register_provider(
            ProviderDescriptor::new("payloads")
                .mark(LibraryProvider)
                .export(Export::of::<Payload, _>(move |_| Ok(Payload { value }))),
        );

        let container = builder.build().unwrap();
        let a = container.get_bean::<Payload>().unwrap();
        let b = container.get_bean::<Payload>().unwrap();

        prop_assert_eq!(a.value, value);
        prop_assert!(Arc::ptr_eq(&a, &b));
        container.destroy();
    }
}

proptest! {
    #[test]
    fn chains_of_any_depth_resolve(n in 1usize..10) {
        let mut builder = ContainerBuilder::new();
        builder.register_provider(chain_provider(n));

        let container = builder.build().unwrap();
        let head = container.get_bean_qualified::<Link>(QUALIFIERS[n - 1]);
        prop_assert!(head.is_ok());

        // Every link in the chain is now cached and resolvable
        for &q in QUALIFIERS.iter().take(n) {
            prop_assert!(container.get_bean_qualified::<Link>(q).is_ok());
        }
        container.destroy();
    }
}

proptest! {
    #[test]
    fn consumed_keys_are_sorted_and_unique(n in 2usize..10) {
        let mut builder = ContainerBuilder::new();
        builder.register_provider(chain_provider(n));

        let container = builder.build().unwrap();
        let consumed = container.consumed_bean_keys();

        // Chain of n links consumes the n-1 non-head links
        prop_assert_eq!(consumed.len(), n - 1);
        for window in consumed.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
        prop_assert_eq!(&consumed[0], &BeanKey::qualified::<Link>(QUALIFIERS[0]));
        container.destroy();
    }
}

proptest! {
    #[test]
    fn duplicate_keys_fail_iff_same_qualifier(i in 0usize..10, j in 0usize..10) {
        let mut builder = ContainerBuilder::new();
        builder
            .register_provider(
                ProviderDescriptor::new("first")
                    .mark(LibraryProvider)
                    .export(Export::of::<Link, _>(|_| Ok(Link)).qualified(QUALIFIERS[i])),
            )
            .register_provider(
                ProviderDescriptor::new("second")
                    .mark(LibraryProvider)
                    .export(Export::of::<Link, _>(|_| Ok(Link)).qualified(QUALIFIERS[j])),
            );

        match builder.build() {
            Ok(container) => {
                prop_assert_ne!(i, j);
                container.destroy();
            }
            Err(ContainerError::DuplicateProvider { key, .. }) => {
                prop_assert_eq!(i, j);
                prop_assert_eq!(key.qualifier(), Some(QUALIFIERS[i]));
            }
            Err(other) => {
                prop_assert!(false, "unexpected error: {}", other);
            }
        }
    }
}

proptest! {
    #[test]
    fn missing_dependency_names_the_gap(present in 0usize..9) {
        // The factory requires a qualifier one past the registered one
        let missing_index = present + 1;

        let mut builder = ContainerBuilder::new();
        builder.register_provider(
            ProviderDescriptor::new("gappy")
                .mark(LibraryProvider)
                .export(Export::of::<Link, _>(|_| Ok(Link)).qualified(QUALIFIERS[present]))
                .export(
                    Export::of::<Payload, _>(|_| Ok(Payload { value: 0 }))
                        .requires_qualified::<Link>(QUALIFIERS[missing_index]),
                ),
        );

        let container = builder.build().unwrap();
        match container.get_bean::<Payload>() {
            Err(ContainerError::MissingBeanDependency { missing, .. }) => {
                prop_assert_eq!(missing.qualifier(), Some(QUALIFIERS[missing_index]));
            }
            _ => {
                prop_assert!(false, "expected MissingBeanDependency");
            }
        }
        container.destroy();
    }
}
