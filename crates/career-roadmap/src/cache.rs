/// Redis cache for catalog embedding vectors.
///
/// All operations degrade gracefully: a miss, a Redis failure, or an undecodable entry
/// all read as "not cached" and the ranker recomputes the vector.
///
/// Key schema:
/// - `crm:v1:vector:{sha256(model_id|text)}` — JSON `Vec<f32>` (no TTL; the key pins
///   both the model and the embedded text)
use sha2::{Digest, Sha256};
use tracing::warn;

use mcp_common::redis::RedisCache;

const KEY_PREFIX: &str = "crm:v1:";

pub struct VectorCache {
    store: Store,
}

enum Store {
    Redis(RedisCache),
    #[cfg(test)]
    Memory(std::sync::Mutex<std::collections::HashMap<String, String>>),
}

impl Store {
    async fn get_many(&self, keys: &[String]) -> Option<Vec<Option<String>>> {
        match self {
            Store::Redis(redis) => redis.get_many(keys).await,
            #[cfg(test)]
            Store::Memory(map) => {
                let map = map.lock().ok()?;
                Some(keys.iter().map(|k| map.get(k).cloned()).collect())
            }
        }
    }

    async fn set_many(&self, entries: &[(String, String)]) -> bool {
        match self {
            Store::Redis(redis) => redis.set_many(entries).await,
            #[cfg(test)]
            Store::Memory(map) => match map.lock() {
                Ok(mut map) => {
                    map.extend(entries.iter().cloned());
                    true
                }
                Err(_) => false,
            },
        }
    }
}

impl VectorCache {
    pub fn new(redis: RedisCache) -> Self {
        Self {
            store: Store::Redis(redis),
        }
    }

    /// Process-local cache for exercising the hit path without a Redis server.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            store: Store::Memory(Default::default()),
        }
    }

    /// Number of vectors held by an in-memory cache.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Memory(map) => map.lock().map(|m| m.len()).unwrap_or(0),
            Store::Redis(_) => 0,
        }
    }

    /// Store a raw JSON payload under the key for `text`, bypassing encoding.
    #[cfg(test)]
    pub async fn put_raw(&self, model_id: &str, text: &str, json: &str) {
        self.store
            .set_many(&[(vector_key(model_id, text), json.to_string())])
            .await;
    }

    /// Look up vectors for `texts`. Always returns one slot per text.
    pub async fn get_vectors(&self, model_id: &str, texts: &[String]) -> Vec<Option<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| vector_key(model_id, t)).collect();
        let Some(values) = self.store.get_many(&keys).await else {
            return vec![None; texts.len()];
        };
        values
            .into_iter()
            .zip(&keys)
            .map(|(value, key)| {
                let json = value?;
                serde_json::from_str(&json)
                    .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
                    .ok()
            })
            .collect()
    }

    pub async fn set_vectors(&self, model_id: &str, entries: &[(&String, &Vec<f32>)]) {
        let encoded: Vec<(String, String)> = entries
            .iter()
            .filter_map(|(text, vector)| {
                let json = serde_json::to_string(vector).ok()?;
                Some((vector_key(model_id, text), json))
            })
            .collect();
        self.store.set_many(&encoded).await;
    }
}

fn vector_key(model_id: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model_id.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    let hash = hasher.finalize();
    format!("{KEY_PREFIX}vector:{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_model_and_text() {
        let a = vector_key("all-MiniLM-L6-v2", "python sql");
        assert!(a.starts_with("crm:v1:vector:"));
        assert_eq!(a, vector_key("all-MiniLM-L6-v2", "python sql"));
        assert_ne!(a, vector_key("all-MiniLM-L6-v2", "python  sql"));
        assert_ne!(a, vector_key("other-model", "python sql"));
    }

    #[tokio::test]
    async fn disabled_cache_misses_every_text() {
        let cache = VectorCache::new(RedisCache::new(None));
        let texts = vec!["a".to_string(), "b".to_string()];
        assert_eq!(cache.get_vectors("m", &texts).await, vec![None, None]);
        let vector = vec![1.0_f32];
        cache.set_vectors("m", &[(&texts[0], &vector)]).await;
        assert_eq!(cache.get_vectors("m", &texts).await, vec![None, None]);
    }

    #[tokio::test]
    async fn in_memory_cache_round_trips_vectors() {
        let cache = VectorCache::in_memory();
        let texts = vec!["a".to_string(), "b".to_string()];
        let vector = vec![0.5_f32, -0.5];
        cache.set_vectors("m", &[(&texts[1], &vector)]).await;
        assert_eq!(cache.get_vectors("m", &texts).await, vec![None, Some(vector)]);
        assert_eq!(cache.get_vectors("other", &texts).await, vec![None, None]);
    }

    #[tokio::test]
    async fn undecodable_entry_reads_as_miss() {
        let cache = VectorCache::in_memory();
        cache.put_raw("m", "a", "not json").await;
        assert_eq!(cache.get_vectors("m", &["a".to_string()]).await, vec![None]);
    }
}
