//! The immutable bean catalog: exactly one factory per bean key.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ContainerError, ContainerResult};
use crate::factory::ExportedFactory;
use crate::key::BeanKey;

/// Vec is faster than HashMap for small catalogs.
const SMALL_THRESHOLD: usize = 16;

/// Built once from scanner output, read-only afterwards.
///
/// Hybrid storage: the first [`SMALL_THRESHOLD`] entries live in a sorted
/// Vec scanned linearly, the rest spill into a HashMap.
pub(crate) struct BeanCatalog {
    small: Vec<(BeanKey, Arc<ExportedFactory>)>,
    large: HashMap<BeanKey, Arc<ExportedFactory>>,
}

impl BeanCatalog {
    /// Index every factory under its produced key.
    ///
    /// A second factory claiming an occupied key is a bootstrap error
    /// naming both providers; first registration wins nothing, the whole
    /// build fails.
    pub(crate) fn build(factories: Vec<ExportedFactory>) -> ContainerResult<Self> {
        let mut catalog = BeanCatalog {
            small: Vec::new(),
            large: HashMap::new(),
        };
        for factory in factories {
            let key = factory.produced().clone();
            if let Some(existing) = catalog.get(&key) {
                return Err(ContainerError::DuplicateProvider {
                    key,
                    first_owner: existing.owner(),
                    second_owner: factory.owner(),
                });
            }
            if catalog.small.len() < SMALL_THRESHOLD {
                catalog.small.push((key, Arc::new(factory)));
            } else {
                catalog.large.insert(key, Arc::new(factory));
            }
        }
        catalog.small.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(catalog)
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &BeanKey) -> Option<&Arc<ExportedFactory>> {
        for (k, factory) in &self.small {
            if k == key {
                return Some(factory);
            }
        }
        self.large.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains(&self, key: &BeanKey) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.small.len() + self.large.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&BeanKey, &Arc<ExportedFactory>)> {
        self.small
            .iter()
            .map(|(k, f)| (k, f))
            .chain(self.large.iter())
    }
}
