//! Per-object memoization with exactly-once construction under races.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::ContainerResult;
use crate::factory::AnyArc;
use crate::key::ObjectId;

/// Number of shards. Powers of 2 spread DefaultHasher output evenly.
const SHARD_COUNT: usize = 64;

/// Instance store shared by every resolution path.
///
/// Sharded by id hash so concurrent construction of unrelated objects never
/// queues on a single lock. Within a shard, readers go through an RwLock
/// fast path; builders serialize on a per-id gate from the `building` table.
pub(crate) struct InstanceCache {
    shards: [Shard; SHARD_COUNT],
}

#[derive(Default)]
struct Shard {
    instances: RwLock<HashMap<ObjectId, AnyArc>>,
    building: Mutex<HashMap<ObjectId, Arc<Mutex<()>>>>,
}

impl InstanceCache {
    pub(crate) fn new() -> Self {
        InstanceCache {
            shards: std::array::from_fn(|_| Shard::default()),
        }
    }

    fn shard(&self, id: &ObjectId) -> &Shard {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARD_COUNT]
    }

    /// The cached instance, without triggering construction.
    pub(crate) fn get(&self, id: &ObjectId) -> Option<AnyArc> {
        self.shard(id).instances.read().unwrap().get(id).cloned()
    }

    /// Return the instance for `id`, invoking `build` at most once per id
    /// across concurrent callers.
    ///
    /// A failed build caches nothing; the next caller re-attempts. Racers
    /// that lose the gate re-check the map and never see a half-built
    /// instance, since `build` only returns after init hooks ran.
    pub(crate) fn get_or_create(
        &self,
        id: &ObjectId,
        build: impl FnOnce() -> ContainerResult<AnyArc>,
    ) -> ContainerResult<AnyArc> {
        let shard = self.shard(id);
        if let Some(existing) = shard.instances.read().unwrap().get(id) {
            return Ok(existing.clone());
        }

        // One gate per id; racers share the entry.
        let gate = {
            let mut building = shard.building.lock().unwrap();
            building
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = gate.lock().unwrap();

        // The winner may have published while we waited on the gate.
        if let Some(existing) = shard.instances.read().unwrap().get(id) {
            return Ok(existing.clone());
        }

        let result = build().map(|instance| {
            // or_insert keeps the first published instance canonical even
            // if a stale gate let a second build slip through.
            shard
                .instances
                .write()
                .unwrap()
                .entry(id.clone())
                .or_insert(instance)
                .clone()
        });
        drop(guard);

        // Spent gates are dropped so the table tracks only in-flight ids. A
        // racer still holding the removed entry just re-checks the map; that
        // overlap is harmless.
        shard.building.lock().unwrap().remove(id);
        result
    }

    pub(crate) fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.instances.read().unwrap().len())
            .sum()
    }

    /// Drop every cached instance and any idle gates.
    pub(crate) fn clear(&self) {
        for shard in &self.shards {
            shard.instances.write().unwrap().clear();
            shard.building.lock().unwrap().clear();
        }
    }
}
