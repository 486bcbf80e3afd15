#![no_main]

use beancan::{
    ContainerBuilder, ContainerError, Export, LibraryProvider, ProviderDescriptor,
    ServiceProvider,
};
use libfuzzer_sys::fuzz_target;

static QUALIFIERS: [&str; 8] = ["q0", "q1", "q2", "q3", "q4", "q5", "q6", "q7"];

struct Node;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the marker shape of each of two providers,
    // the rest assigns exports (by qualifier index) to one of them.
    let marker_a = data[0] & 0x03;
    let marker_b = (data[0] >> 2) & 0x03;

    let mut provider_a = mark(ProviderDescriptor::new("alpha"), marker_a);
    let mut provider_b = mark(ProviderDescriptor::new("beta"), marker_b);

    for &byte in &data[1..] {
        let qualifier = QUALIFIERS[(byte & 0x07) as usize];
        let export = Export::of::<Node, _>(|_| Ok(Node)).qualified(qualifier);
        if byte & 0x08 == 0 {
            provider_a = provider_a.export(export);
        } else {
            provider_b = provider_b.export(export);
        }
    }

    let mut builder = ContainerBuilder::new();
    builder
        .register_provider(provider_a)
        .register_provider(provider_b);

    // Bootstrap must never panic; failures are confined to the two
    // bootstrap error kinds.
    match builder.build() {
        Ok(container) => {
            container.destroy();
        }
        Err(ContainerError::DuplicateProvider { .. }) => {}
        Err(ContainerError::IllegalProvider { .. }) => {}
        Err(other) => panic!("unexpected bootstrap error: {}", other),
    }
});

fn mark(descriptor: ProviderDescriptor, shape: u8) -> ProviderDescriptor {
    match shape {
        0 => descriptor.mark(LibraryProvider),
        1 => descriptor.mark(ServiceProvider::new("direct")),
        2 => descriptor,
        _ => descriptor
            .mark(LibraryProvider)
            .mark(ServiceProvider::new("direct")),
    }
}
