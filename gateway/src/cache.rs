// Per-endpoint memoization of the last upstream responses, keyed by the fully
// resolved upstream URL so distinct parameterizations never share an entry.
// Fallback payloads are stored with the same TTL as successes.
use moka::sync::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const CAPACITY: u64 = 256;

pub struct ResponseCache {
    cache: Cache<String, Arc<Value>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(CAPACITY)
            .time_to_live(ttl)
            .build();

        ResponseCache { cache }
    }

    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, payload: Arc<Value>) {
        self.cache.insert(key, payload);
    }
}
