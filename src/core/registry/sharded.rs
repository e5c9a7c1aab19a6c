//! Lock-striped registry implementation

use super::EnvioRegistry;
use crate::domain::{Envio, Result};
use parking_lot::RwLock;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

/// Default number of lock stripes
pub const DEFAULT_SHARDS: usize = 16;

/// Registry backed by a fixed set of `RwLock`-guarded maps
///
/// Each id hashes to one shard, so writers to different shards never contend
/// and a reader copying the whole registry holds one shard lock at a time.
/// Records are stored behind `Arc` so a full copy only clones references while
/// a lock is held.
///
/// # Examples
///
/// ```
/// use ecologistics::core::registry::{EnvioRegistry, ShardedRegistry};
/// use ecologistics::domain::Envio;
///
/// let registry = ShardedRegistry::new();
/// registry.upsert(Envio::new("S1", "Ana", "Calle 1", "pendiente")).unwrap();
/// registry.upsert(Envio::new("S1", "Ana", "Calle 1", "enviado")).unwrap();
///
/// assert_eq!(registry.find_by_id("S1").unwrap().status, "enviado");
/// assert_eq!(registry.len(), 1);
/// ```
pub struct ShardedRegistry {
    shards: Box<[RwLock<HashMap<String, Arc<Envio>>>]>,
    hasher: RandomState,
}

impl ShardedRegistry {
    /// Creates an empty registry with [`DEFAULT_SHARDS`] stripes
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Creates an empty registry with `shards` stripes (at least one)
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    fn shard(&self, id: &str) -> &RwLock<HashMap<String, Arc<Envio>>> {
        let idx = (self.hasher.hash_one(id) as usize) % self.shards.len();
        &self.shards[idx]
    }
}

impl Default for ShardedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvioRegistry for ShardedRegistry {
    fn upsert(&self, envio: Envio) -> Result<()> {
        envio.validate()?;
        let record = Arc::new(envio);
        self.shard(&record.id)
            .write()
            .insert(record.id.clone(), record);
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Option<Envio> {
        let record = self.shard(id).read().get(id).cloned();
        record.map(|r| (*r).clone())
    }

    fn find_all(&self) -> Vec<Envio> {
        let mut refs = Vec::new();
        for shard in self.shards.iter() {
            refs.extend(shard.read().values().cloned());
        }
        refs.into_iter().map(|r| (*r).clone()).collect()
    }

    fn clear(&self) {
        for shard in self.shards.iter() {
            shard.write().clear();
        }
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EcoError;
    use std::thread;

    #[test]
    fn test_upsert_and_find() {
        let registry = ShardedRegistry::new();
        let envio = Envio::new("S1", "Ana", "Calle 1", "enviado");
        registry.upsert(envio.clone()).unwrap();
        assert_eq!(registry.find_by_id("S1"), Some(envio));
        assert_eq!(registry.find_by_id("S2"), None);
    }

    #[test]
    fn test_blank_id_rejected_and_registry_unchanged() {
        let registry = ShardedRegistry::new();
        registry
            .upsert(Envio::new("S1", "Ana", "Calle 1", "enviado"))
            .unwrap();

        let result = registry.upsert(Envio::new("  ", "Eve", "Calle 3", "pendiente"));
        assert!(matches!(result, Err(EcoError::InvalidRecord(_))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_by_id("  "), None);
    }

    #[test]
    fn test_last_write_wins() {
        let registry = ShardedRegistry::new();
        registry.upsert(Envio::new("X", "c", "d", "A")).unwrap();
        registry.upsert(Envio::new("X", "c", "d", "B")).unwrap();
        assert_eq!(registry.find_by_id("X").unwrap().status, "B");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_all_returns_copy() {
        let registry = ShardedRegistry::new();
        registry.upsert(Envio::new("S1", "Ana", "Calle 1", "enviado")).unwrap();

        let mut all = registry.find_all();
        all[0].status = "perdido".to_string();
        all.clear();

        assert_eq!(registry.find_by_id("S1").unwrap().status, "enviado");
        assert_eq!(registry.find_all().len(), 1);
    }

    #[test]
    fn test_clear() {
        let registry = ShardedRegistry::with_shards(2);
        registry.upsert(Envio::new("S1", "", "", "")).unwrap();
        registry.upsert(Envio::new("S2", "", "", "")).unwrap();
        assert!(!registry.is_empty());
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.find_all().is_empty());
    }

    #[test]
    fn test_zero_shards_clamped() {
        let registry = ShardedRegistry::with_shards(0);
        registry.upsert(Envio::new("S1", "", "", "")).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_upserts_no_lost_updates() {
        let registry = Arc::new(ShardedRegistry::new());
        let writers = 8;
        let per_writer = 250;

        let handles: Vec<_> = (0..writers)
            .map(|w| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..per_writer {
                        let id = format!("W{w}-{i}");
                        registry.upsert(Envio::new(id, "c", "d", "e")).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), writers * per_writer);
        assert_eq!(registry.find_all().len(), writers * per_writer);
    }
}
