#![no_main]

use beancan::{ConfigSource, DynamicConfig, MapConfigSource};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let source = MapConfigSource::new();

    // Seed properties k0, k1, ... from arbitrary byte chunks.
    let mut values = Vec::new();
    for (index, chunk) in data.chunks(8).enumerate().take(16) {
        let value = String::from_utf8_lossy(chunk).into_owned();
        source.set(format!("k{}", index), value.clone());
        values.push(value);
    }

    let config = DynamicConfig::new(vec![Arc::new(source) as Arc<dyn ConfigSource>]);

    for (index, raw) in values.iter().enumerate() {
        let name = format!("k{}", index);

        // Lookups never panic and reproduce the stored string verbatim.
        assert_eq!(config.get(&name).as_deref(), Some(raw.as_str()));
        assert_eq!(&config.string_property(&name, "fallback"), raw);

        // Typed reads parse or fall back, never panic.
        let long = config.long_property(&name, -1);
        match raw.parse::<i64>() {
            Ok(parsed) => assert_eq!(long, parsed),
            Err(_) => assert_eq!(long, -1),
        }

        let flag = config.bool_property(&name, true);
        match raw.parse::<bool>() {
            Ok(parsed) => assert_eq!(flag, parsed),
            Err(_) => assert!(flag),
        }
    }

    // Unset names always fall back to the caller's default.
    assert_eq!(config.get("unset"), None);
    assert_eq!(config.string_property("unset", "fallback"), "fallback");
    assert_eq!(config.long_property("unset", 7), 7);
});
