mod noop_store;
mod redis_store;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use noop_store::NoopCacheStore;
use redis_store::RedisCacheStore;

/// Guild configuration rows change rarely and are invalidated on write.
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
/// Per-guild filter snapshots are read on every guild message.
pub const FILTER_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
/// Converter units outlive one refresh cycle so a failed refresh keeps the old list.
pub const CONVERTER_UNITS_TTL: Duration = Duration::from_secs(36 * 60 * 60);

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled(NoopCacheStore),
    Redis(RedisCacheStore),
}

#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled(NoopCacheStore),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.ping().await,
            CacheBackend::Redis(store) => store.ping().await,
        }
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let value = match &self.backend {
            CacheBackend::Disabled(store) => store.get(key).await,
            CacheBackend::Redis(store) => store.get(key).await,
        }?;

        match value {
            Some(bytes) => {
                let parsed = serde_json::from_slice(&bytes).map_err(|e| {
                    anyhow::anyhow!("failed to deserialize cache value for `{key}`: {e}")
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let ttl_seconds = ttl.as_secs().max(1);
        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow::anyhow!("failed to serialize cache value for `{key}`: {e}"))?;

        match &self.backend {
            CacheBackend::Disabled(store) => store.set(key, payload, ttl_seconds).await,
            CacheBackend::Redis(store) => store.set(key, payload, ttl_seconds).await,
        }
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.del(key).await,
            CacheBackend::Redis(store) => store.del(key).await,
        }
    }

    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(
                ?e,
                cache_key = key,
                "cache get failed; falling back to database"
            ),
        }

        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(
                ?e,
                cache_key = key,
                "cache set failed; returning database value"
            );
        }

        Ok(loaded)
    }
}

pub fn filter_snapshot_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("filter:{guild_id}"))
}

pub fn warn_config_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("warn_config:{guild_id}"))
}

pub fn snipe_config_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("snipe_config:{guild_id}"))
}

pub fn converter_units_key(cache: &CacheService) -> String {
    cache.key("converter_units")
}

pub async fn invalidate_filter(cache: &CacheService, guild_id: u64) -> anyhow::Result<()> {
    cache.del(&filter_snapshot_key(cache, guild_id)).await
}

pub async fn invalidate_warn_config(cache: &CacheService, guild_id: u64) -> anyhow::Result<()> {
    cache.del(&warn_config_key(cache, guild_id)).await
}

pub async fn invalidate_snipe_config(cache: &CacheService, guild_id: u64) -> anyhow::Result<()> {
    cache.del(&snipe_config_key(cache, guild_id)).await
}

#[cfg(test)]
mod tests {
    use super::{CacheService, filter_snapshot_key};

    #[test]
    fn keys_are_prefixed() {
        let cache = CacheService::disabled("mewdeko:test");
        assert_eq!(cache.key("abc"), "mewdeko:test:abc");
        assert_eq!(filter_snapshot_key(&cache, 42), "mewdeko:test:filter:42");
    }

    #[tokio::test]
    async fn disabled_cache_always_loads() {
        let cache = CacheService::disabled("mewdeko:test");
        cache
            .set_json("k", &vec![1_u32, 2, 3], std::time::Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(cache.get_json::<Vec<u32>>("k").await.unwrap(), None);

        let loaded = cache
            .get_or_load_json("k", std::time::Duration::from_secs(5), || async {
                Ok(vec![7_u32])
            })
            .await
            .unwrap();
        assert_eq!(loaded, vec![7]);
        assert!(!cache.is_redis_enabled());
    }
}
