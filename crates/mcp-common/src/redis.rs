/// Redis cache wrapper with graceful degradation.
///
/// All operations return `Option<T>` or `bool`. On any Redis error, the operation logs a warning
/// and returns `None`. Callers fall through to compute from source. The system is fully
/// functional without Redis.
use tracing::warn;

pub struct RedisCache {
    client: Option<redis::Client>,
}

impl RedisCache {
    /// Attempt to connect to Redis. If the URL is `None` or connection fails,
    /// returns a `RedisCache` that always degrades gracefully (no-ops).
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, cache disabled"))
                .ok()
        });
        Self { client }
    }

    /// Test the connection by sending a PING. Returns `true` if Redis is reachable.
    pub async fn is_available(&self) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
                result.is_ok()
            }
            Err(_) => false,
        }
    }

    /// Fetch several keys in one round trip (MGET).
    ///
    /// Returns `None` if Redis is unavailable; otherwise one slot per key, in key order,
    /// with `None` for keys that do not exist.
    pub async fn get_many(&self, keys: &[String]) -> Option<Vec<Option<String>>> {
        if keys.is_empty() {
            return Some(Vec::new());
        }
        let client = self.client.as_ref()?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()?;
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .inspect_err(|e| warn!(error = %e, count = keys.len(), "redis MGET failed"))
            .ok()?;
        (values.len() == keys.len()).then_some(values)
    }

    /// Store several key/value pairs with no expiry in a single pipeline.
    /// Returns `true` if every write succeeded.
    pub async fn set_many(&self, entries: &[(String, String)]) -> bool {
        if entries.is_empty() {
            return true;
        }
        let Some(client) = &self.client else {
            return false;
        };
        let Ok(mut conn) = client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
        else {
            return false;
        };
        let mut pipe = redis::pipe();
        for (key, value) in entries {
            pipe.set(key, value).ignore();
        }
        let result: redis::RedisResult<()> = pipe.query_async(&mut conn).await;
        result
            .inspect_err(|e| warn!(error = %e, count = entries.len(), "redis pipelined SET failed"))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::RedisCache;

    #[tokio::test]
    async fn missing_url_degrades_to_noop() {
        let cache = RedisCache::new(None);
        assert!(!cache.is_available().await);
        assert_eq!(cache.get_many(&["a".to_string()]).await, None);
        assert!(!cache.set_many(&[("a".to_string(), "1".to_string())]).await);
    }

    #[tokio::test]
    async fn empty_batches_short_circuit() {
        let cache = RedisCache::new(None);
        assert_eq!(cache.get_many(&[]).await, Some(Vec::new()));
        assert!(cache.set_many(&[]).await);
    }

    #[tokio::test]
    async fn invalid_url_degrades_to_noop() {
        let cache = RedisCache::new(Some("not a redis url"));
        assert!(!cache.is_available().await);
        assert_eq!(cache.get_many(&["k".to_string()]).await, None);
    }
}
