//! The generic cached read-through proxy. Every listing/aggregate endpoint is
//! one `CachedProxy` value plus a handful of closures; the cache, timeout,
//! fallback, and never-fail contract all live here.

use crate::cache::ResponseCache;
use crate::metrics_defs::{CACHE_HIT, CACHE_MISS, FALLBACK_SERVED, UPSTREAM_ERROR};
use crate::upstream::ContentApi;
use serde_json::Value;
use shared::counter;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy)]
pub struct EndpointPolicy {
    pub name: &'static str,
    pub ttl: Duration,
    pub timeout: Duration,
}

pub struct CachedProxy {
    policy: EndpointPolicy,
    cache: ResponseCache,
}

impl CachedProxy {
    pub fn new(policy: EndpointPolicy) -> Self {
        CachedProxy {
            policy,
            cache: ResponseCache::new(policy.ttl),
        }
    }

    /// Read-through fetch. Returns the cached payload when fresh; otherwise
    /// fetches the upstream within the endpoint's time budget, shapes the
    /// body, and degrades to `fallback` on any failure or on a semantically
    /// empty result. Whatever is produced, real or fallback, is written back
    /// to the cache under the resolved URL, so a struggling upstream is
    /// retried at most once per TTL window.
    pub async fn get(
        &self,
        api: &ContentApi,
        url: Url,
        shape: impl FnOnce(Value) -> Value,
        is_empty: impl FnOnce(&Value) -> bool,
        fallback: impl FnOnce() -> Value,
    ) -> Arc<Value> {
        let key = url.as_str().to_string();

        if let Some(hit) = self.cache.get(&key) {
            counter!(CACHE_HIT, "endpoint" => self.policy.name).increment(1);
            return hit;
        }
        counter!(CACHE_MISS, "endpoint" => self.policy.name).increment(1);

        let payload = match api.get_json(url, self.policy.timeout).await {
            Ok(body) => {
                let shaped = shape(body);
                if is_empty(&shaped) {
                    tracing::warn!(
                        endpoint = self.policy.name,
                        "upstream returned an empty result, serving fallback"
                    );
                    counter!(FALLBACK_SERVED, "endpoint" => self.policy.name).increment(1);
                    fallback()
                } else {
                    shaped
                }
            }
            Err(err) => {
                tracing::warn!(
                    endpoint = self.policy.name,
                    error = %err,
                    "upstream fetch failed, serving fallback"
                );
                counter!(UPSTREAM_ERROR, "endpoint" => self.policy.name).increment(1);
                counter!(FALLBACK_SERVED, "endpoint" => self.policy.name).increment(1);
                fallback()
            }
        };

        let payload = Arc::new(payload);
        self.cache.insert(key, payload.clone());
        payload
    }
}
