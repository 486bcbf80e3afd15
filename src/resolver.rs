//! Dependency resolution: from one requested key to an ordered build plan.

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::BeanCatalog;
use crate::error::{ContainerError, ContainerResult};
use crate::factory::ExportedFactory;
use crate::key::{BeanKey, ObjectId};

/// Factories to invoke for one request, dependencies strictly before
/// dependents. Ephemeral; a fresh plan is computed per resolution call.
pub(crate) struct BuildPlan {
    order: Vec<Arc<ExportedFactory>>,
}

impl BuildPlan {
    pub(crate) fn factories(&self) -> &[Arc<ExportedFactory>] {
        &self.order
    }

    #[cfg(test)]
    fn keys(&self) -> Vec<&BeanKey> {
        self.order.iter().map(|f| f.produced()).collect()
    }
}

/// Walk everything `root` needs, depth-first.
///
/// Each factory's requirements are visited in declaration order; keys shared
/// between branches are planned once. A key already on the walk stack is a
/// cycle, reported with the full path. A key the catalog lacks is
/// [`MissingBeanProvider`](ContainerError::MissingBeanProvider) for the root
/// and [`MissingBeanDependency`](ContainerError::MissingBeanDependency) below
/// it, naming the factory that asked.
pub(crate) fn resolve(catalog: &BeanCatalog, root: &BeanKey) -> ContainerResult<BuildPlan> {
    let mut resolver = Resolver {
        catalog,
        done: HashSet::new(),
        path: Vec::new(),
        order: Vec::new(),
    };
    resolver.visit(root, None)?;
    Ok(BuildPlan {
        order: resolver.order,
    })
}

struct Resolver<'c> {
    catalog: &'c BeanCatalog,
    done: HashSet<BeanKey>,
    path: Vec<BeanKey>,
    order: Vec<Arc<ExportedFactory>>,
}

impl<'c> Resolver<'c> {
    fn visit(&mut self, key: &BeanKey, required_by: Option<&BeanKey>) -> ContainerResult<()> {
        if self.done.contains(key) {
            return Ok(());
        }
        if let Some(cycle_start) = self.path.iter().position(|k| k == key) {
            let path = self.path[cycle_start..]
                .iter()
                .chain(std::iter::once(key))
                .map(|k| ObjectId::bean(k.clone()))
                .collect();
            return Err(ContainerError::CircularDependency { path });
        }
        let factory = match self.catalog.get(key) {
            Some(factory) => factory,
            None => {
                return Err(match required_by {
                    None => ContainerError::MissingBeanProvider { key: key.clone() },
                    Some(parent) => ContainerError::MissingBeanDependency {
                        required_by: parent.clone(),
                        missing: key.clone(),
                    },
                })
            }
        };
        self.path.push(key.clone());
        for dep in factory.required_keys() {
            self.visit(dep, Some(key))?;
        }
        self.path.pop();
        self.done.insert(key.clone());
        self.order.push(factory.clone());
        Ok(())
    }
}
