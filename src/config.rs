//! Dynamic configuration handle for factories and injected classes.
//!
//! The container never interprets configuration values: it only chains
//! external sources and hands out the lookup handle. File and environment
//! backed sources belong to outside collaborators; the in-crate
//! [`MapConfigSource`] exists for tests and programmatic overrides.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A named-value source consulted by [`DynamicConfig`].
///
/// Implementations return the current value for a property name, or `None`
/// when they do not know the name. Sources are expected to be cheap to
/// query; the container reads them on demand and never caches results.
pub trait ConfigSource: Send + Sync + 'static {
    /// Current value for `name`, if this source defines it.
    fn get(&self, name: &str) -> Option<String>;
}

/// Ordered chain of configuration sources, first hit wins.
///
/// # Examples
///
/// ```rust
/// use beancan::{DynamicConfig, MapConfigSource};
/// use std::sync::Arc;
///
/// let overrides = Arc::new(MapConfigSource::new());
/// overrides.set("greeting.prefix", "hello: ");
/// overrides.set("pool.size", "8");
///
/// let defaults = Arc::new(MapConfigSource::new());
/// defaults.set("pool.size", "4");
/// defaults.set("pool.enabled", "true");
///
/// let config = DynamicConfig::new(vec![overrides, defaults]);
/// assert_eq!(config.get("greeting.prefix").as_deref(), Some("hello: "));
/// assert_eq!(config.long_property("pool.size", 1), 8);
/// assert!(config.bool_property("pool.enabled", false));
/// assert_eq!(config.string_property("missing", "fallback"), "fallback");
/// ```
#[derive(Clone)]
pub struct DynamicConfig {
    sources: Vec<Arc<dyn ConfigSource>>,
}

impl DynamicConfig {
    /// Chain the given sources; earlier sources shadow later ones.
    pub fn new(sources: Vec<Arc<dyn ConfigSource>>) -> Self {
        DynamicConfig { sources }
    }

    /// A config with no sources; every lookup misses.
    pub fn empty() -> Self {
        DynamicConfig {
            sources: Vec::new(),
        }
    }

    /// The raw value for `name` from the first source that defines it.
    pub fn get(&self, name: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.get(name))
    }

    /// String value for `name`, or `default` when unset.
    pub fn string_property(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    /// Integer value for `name`; unset or unparsable values fall back to `default`.
    pub fn long_property(&self, name: &str, default: i64) -> i64 {
        match self.get(name) {
            Some(raw) => match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(property = name, value = %raw, "not a number, using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Boolean value for `name`; unset or unparsable values fall back to `default`.
    pub fn bool_property(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(raw) => match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(property = name, value = %raw, "not a boolean, using default");
                    default
                }
            },
            None => default,
        }
    }
}

impl fmt::Debug for DynamicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicConfig")
            .field("sources", &self.sources.len())
            .finish()
    }
}

/// In-memory configuration source.
///
/// Values can be changed after the container is built; readers always see
/// the latest value, which is what makes properties "dynamic".
#[derive(Default)]
pub struct MapConfigSource {
    values: Mutex<HashMap<String, String>>,
}

impl MapConfigSource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.lock().unwrap().insert(name.into(), value.into());
    }
}

impl ConfigSource for MapConfigSource {
    fn get(&self, name: &str) -> Option<String> {
        self.values.lock().unwrap().get(name).cloned()
    }
}
