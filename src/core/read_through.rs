use crate::domain::ports::CacheStore;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Every call site caches for three hours.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 3);

/// Get-or-fetch-and-store over a [`CacheStore`].
///
/// The cache holds the raw upstream JSON body. The payload type is only
/// known to the caller.
#[derive(Debug, Clone)]
pub struct ReadThroughCache<S: CacheStore> {
    store: S,
}

impl<S: CacheStore> ReadThroughCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the cached value under `key`, or runs `fetch` once and stores
    /// its body for `ttl`.
    ///
    /// A failing `fetch` leaves the store untouched. A `null` body is returned
    /// without being stored.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        if let Some(cached) = self.store.get(key).await? {
            match serde_json::from_str::<T>(&cached) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "discarding unreadable cache entry");
                }
            }
        }

        tracing::debug!(key, "cache miss");
        let body = fetch().await?;

        let raw: Value = serde_json::from_str(&body)?;
        let is_null = raw.is_null();
        let value: T = serde_json::from_value(raw)?;

        if is_null {
            tracing::debug!(key, "upstream returned null, not caching");
        } else {
            self.store.set_ex(key, ttl, &body).await?;
            tracing::debug!(key, ttl_secs = ttl.as_secs(), "cache populated");
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::utils::error::AppError;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        id: String,
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let store = MemoryStore::new();
        store
            .set_ex("anime:naruto", DEFAULT_CACHE_TTL, r#"{"id":"naruto"}"#)
            .await
            .unwrap();
        let cache = ReadThroughCache::new(store);

        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let value: Payload = cache
            .get_or_fetch("anime:naruto", DEFAULT_CACHE_TTL, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(r#"{"id":"other"}"#.to_string())
            })
            .await
            .unwrap();

        assert_eq!(value.id, "naruto");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_once_and_stores_body() {
        let cache = ReadThroughCache::new(MemoryStore::new());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(r#"{"id":"bleach"}"#.to_string())
        };

        let first: Payload = cache
            .get_or_fetch("anime:bleach", DEFAULT_CACHE_TTL, fetch)
            .await
            .unwrap();
        let second: Payload = cache
            .get_or_fetch("anime:bleach", DEFAULT_CACHE_TTL, fetch)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.store().get("anime:bleach").await.unwrap().as_deref(),
            Some(r#"{"id":"bleach"}"#)
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_store() {
        let cache = ReadThroughCache::new(MemoryStore::new());

        let result: Result<Payload> = cache
            .get_or_fetch("recents", DEFAULT_CACHE_TTL, || async {
                Err(AppError::Upstream {
                    endpoint: "http://upstream/meta/anilist/recent-episodes".to_string(),
                    status: 500,
                })
            })
            .await;

        assert!(matches!(result, Err(AppError::Upstream { status: 500, .. })));
        assert!(cache.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_null_body_is_not_stored() {
        let cache = ReadThroughCache::new(MemoryStore::new());

        let value: Option<Payload> = cache
            .get_or_fetch("seasonal", DEFAULT_CACHE_TTL, || async { Ok("null".to_string()) })
            .await
            .unwrap();

        assert!(value.is_none());
        assert!(cache.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_refetched() {
        let store = MemoryStore::new();
        store
            .set_ex("anime:x", DEFAULT_CACHE_TTL, "not json")
            .await
            .unwrap();
        let cache = ReadThroughCache::new(store);

        let value: Payload = cache
            .get_or_fetch("anime:x", DEFAULT_CACHE_TTL, || async {
                Ok(r#"{"id":"x"}"#.to_string())
            })
            .await
            .unwrap();

        assert_eq!(value.id, "x");
        assert_eq!(
            cache.store().get("anime:x").await.unwrap().as_deref(),
            Some(r#"{"id":"x"}"#)
        );
    }

    #[tokio::test]
    async fn test_mismatched_body_is_not_stored() {
        let cache = ReadThroughCache::new(MemoryStore::new());

        let result: Result<Payload> = cache
            .get_or_fetch("anime:y", DEFAULT_CACHE_TTL, || async {
                Ok(r#"{"message":"not found"}"#.to_string())
            })
            .await;

        assert!(matches!(result, Err(AppError::Serialization(_))));
        assert!(cache.store().is_empty().await);
    }
}
