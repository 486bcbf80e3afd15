#![no_main]

use beancan::{ContainerBuilder, ContainerError, Export, LibraryProvider, ProviderDescriptor};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

static QUALIFIERS: [&str; 8] = ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"];

struct Node;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte fixes the node count, remaining byte pairs add edges
    // between nodes. Self-edges and back-edges produce cycles on purpose.
    let node_count = (data[0] & 0x07) as usize + 1;
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for pair in data[1..].chunks_exact(2) {
        let from = (pair[0] & 0x07) as usize % node_count;
        let to = (pair[1] & 0x07) as usize % node_count;
        edges[from].push(to);
    }

    let mut descriptor = ProviderDescriptor::new("graph").mark(LibraryProvider);
    for (index, deps) in edges.iter().enumerate() {
        let deps = deps.clone();
        let mut export = Export::of::<Node, _>(move |cx| {
            for &dep in &deps {
                cx.get_qualified::<Node>(QUALIFIERS[dep])?;
            }
            Ok(Node)
        })
        .qualified(QUALIFIERS[index]);
        for &dep in &edges[index] {
            export = export.requires_qualified::<Node>(QUALIFIERS[dep]);
        }
        descriptor = descriptor.export(export);
    }

    let mut builder = ContainerBuilder::new();
    builder.register_provider(descriptor);
    let container = match builder.build() {
        Ok(container) => container,
        Err(_) => return,
    };

    // Every node either resolves or reports a cycle; nothing panics and
    // nothing deadlocks. Successful resolutions are stable.
    for index in 0..node_count {
        match container.get_bean_qualified::<Node>(QUALIFIERS[index]) {
            Ok(first) => {
                let second = container.get_bean_qualified::<Node>(QUALIFIERS[index]).unwrap();
                assert!(Arc::ptr_eq(&first, &second));
            }
            Err(ContainerError::CircularDependency { path }) => {
                assert!(path.len() >= 2);
                assert_eq!(path.first(), path.last());
            }
            Err(other) => panic!("unexpected resolution error: {}", other),
        }
    }

    container.destroy();
});
