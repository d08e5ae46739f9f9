use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::api_client::ApiError;

/// In-memory cache of backend read queries.
///
/// Entries are keyed by `<scope>:<query key>` where the scope identifies the
/// signed-in session, so one user's lists are never served to another. Each
/// entry stays fresh for the configured window; mutations drop the affected
/// key right away.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<Cache<String, Arc<Value>>>,
}

impl QueryCache {
    pub fn new(capacity: u64, fresh_for: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(fresh_for)
            .build();

        Self {
            entries: Arc::new(entries),
        }
    }

    fn key(scope: &str, query_key: &str) -> String {
        format!("{}:{}", scope, query_key)
    }

    /// Returns the cached value for `query_key`, or runs `fetch` (retrying
    /// once on failure) and caches what it returns.
    pub async fn fetch<T, F, Fut>(&self, scope: &str, query_key: &str, fetch: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        let key = Self::key(scope, query_key);

        let data = match self.entries.get(&key).await {
            Some(hit) => {
                tracing::debug!(query_key = %query_key, "Query cache hit");
                hit
            }
            None => {
                tracing::debug!(query_key = %query_key, "Query cache miss");
                let value = match fetch().await {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(query_key = %query_key, error = %e, "Query failed, retrying once");
                        fetch().await?
                    }
                };
                let value = Arc::new(value);
                self.entries.insert(key, value.clone()).await;
                value
            }
        };

        Ok(T::deserialize(data.as_ref())?)
    }

    pub async fn invalidate(&self, scope: &str, query_key: &str) {
        tracing::debug!(query_key = %query_key, "Invalidating query");
        self.entries.invalidate(&Self::key(scope, query_key)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> QueryCache {
        QueryCache::new(100, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ApiError>(json!([{"id": 1}]))
        };

        let first: Vec<Value> = cache.fetch("s1", "faculties", fetch).await.unwrap();
        let second: Vec<Value> = cache.fetch("s1", "faculties", fetch).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_for_that_key_only() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ApiError>(json!([]))
        };

        let _: Vec<Value> = cache.fetch("s1", "faculties", fetch).await.unwrap();
        let _: Vec<Value> = cache.fetch("s1", "programs", fetch).await.unwrap();
        cache.invalidate("s1", "faculties").await;
        let _: Vec<Value> = cache.fetch("s1", "faculties", fetch).await.unwrap();
        let _: Vec<Value> = cache.fetch("s1", "programs", fetch).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let cache = cache();
        let _: Vec<Value> = cache
            .fetch("s1", "users", || async { Ok::<_, ApiError>(json!([{"id": 1}])) })
            .await
            .unwrap();
        let other: Vec<Value> = cache
            .fetch("s2", "users", || async { Ok::<_, ApiError>(json!([])) })
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_failed_read_is_retried_once() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(ApiError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    message: "busy".to_string(),
                })
            } else {
                Ok::<_, ApiError>(json!([]))
            }
        };

        let rows: Vec<Value> = cache.fetch("s1", "courses", fetch).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_one_retry() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<Value, _>(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "down".to_string(),
            })
        };

        let result: Result<Vec<Value>, _> = cache.fetch("s1", "courses", fetch).await;
        assert_eq!(result.unwrap_err().to_string(), "down");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
